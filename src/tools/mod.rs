//! SailfishOS export MCP tools module
//!
//! This module provides a unified tool handler for SailfishOS export
//! operations using the RMCP 0.3.2 API patterns.

pub mod export_tools;
pub mod types;

pub use export_tools::*;
pub use types::*;
