//! SailfishOS Export MCP Server
//!
//! A Model Context Protocol server that packages Godot projects as
//! SailfishOS RPMs. It validates the Sailfish SDK, picks a build target
//! through `sfdk` and stages the RPM buildroot, optionally running rpmbuild
//! inside the SDK build engine.

pub mod config;
pub mod error;
pub mod export;
pub mod pack;
pub mod paths;
pub mod platform;
pub mod preset;
pub mod process;
pub mod project;
pub mod sdk;
pub mod sfdk;
pub mod templates;
pub mod tools;

pub use error::{ExportError, Result};
pub use config::Config;
pub use export::Exporter;
pub use preset::ExportPreset;
pub use tools::SailfishExportToolHandler;
