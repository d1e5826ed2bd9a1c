//! Error types for the sailfish-export MCP server

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SailfishOS export operations
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cant export without SailfishOS export templates")]
    MissingTemplates,

    #[error("Template files not exists")]
    TemplatesNotFound,

    #[error("Wrong SailfishSDK path: {0}")]
    SdkNotFound(PathBuf),

    #[error("Wrong SailfishSDK path: cant find \"sdk-release\" file in {0}")]
    SdkReleaseMissing(PathBuf),

    #[error("Cant parse \"sdk-release\" file in SailfishSDK directory: {0}")]
    SdkReleaseUnparsable(String),

    #[error("Minimum SailfishSDK version is {minimum}, current is {current}")]
    SdkTooOld { minimum: String, current: String },

    #[error("Wrong SailfishSDK path or sfdk tool not exists: {0}")]
    SfdkNotFound(PathBuf),

    #[error("Cant open XML file: {path}: {reason}")]
    BuildEnginesConfig { path: PathBuf, reason: String },

    #[error(
        "Export path is outside of Shared Home in SailfishSDK (choose export path inside shared home):\n\
         SharedHome: {shared_home}\nSharedSource: {shared_src}"
    )]
    ExportPathOutsideShared {
        shared_home: String,
        shared_src: String,
    },

    #[error("No usable SailfishOS build target: {0}")]
    NoBuildTarget(String),

    #[error("{tool} exited with status {code}")]
    ToolFailed { tool: String, code: i32 },

    #[error("Failed to launch {tool}: {reason}")]
    ToolLaunch { tool: String, reason: String },

    #[error("Cant create directory: {0}")]
    CreateDir(PathBuf),

    #[error("rpmbuild finished but no package was found in {0}")]
    RpmNotProduced(PathBuf),

    #[error("Cant create *.pck: {0}")]
    PackFailed(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Preset parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ExportError {
    /// True when export failed because no template binary is configured at all
    pub fn is_missing_templates(&self) -> bool {
        matches!(self, Self::MissingTemplates)
    }

    /// True for errors caused by the preset or SDK setup rather than by a
    /// failure while running the export
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingTemplates
                | Self::TemplatesNotFound
                | Self::SdkNotFound(_)
                | Self::SdkReleaseMissing(_)
                | Self::SdkReleaseUnparsable(_)
                | Self::SdkTooOld { .. }
                | Self::SfdkNotFound(_)
                | Self::BuildEnginesConfig { .. }
                | Self::ExportPathOutsideShared { .. }
                | Self::ProjectNotFound(_)
                | Self::InvalidConfig(_)
                | Self::TomlError(_)
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ExportError>;
