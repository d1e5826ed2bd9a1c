//! Type definitions for SailfishOS export MCP tools

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

use crate::export::{ExportOutcome, TemplateBinary};
use crate::platform::{ExportOption, TargetArch};
use crate::preset::ExportPreset;

// ============================================================================
// platform_info
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlatformInfoArgs {}

#[derive(Debug, Serialize)]
pub struct PlatformInfoResult {
    pub name: String,
    pub os_name: String,
    /// Feature tags the platform enables (e.g., "mobile")
    pub features: Vec<String>,
    /// File extensions of exported packages
    pub binary_extensions: Vec<String>,
}

// ============================================================================
// export_options
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportOptionsArgs {}

#[derive(Debug, Serialize)]
pub struct ExportOptionsResult {
    pub options: Vec<ExportOption>,
}

// ============================================================================
// can_export
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CanExportArgs {
    /// Path to a TOML preset file (default: --preset)
    #[serde(default)]
    pub preset_file: Option<String>,
    /// Inline preset, takes precedence over preset_file
    #[serde(default)]
    pub preset: Option<ExportPreset>,
    /// Validate the debug template binaries
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Serialize)]
pub struct CanExportResult {
    pub can_export: bool,
    /// No template binary configured at all
    pub missing_templates: bool,
    /// Why the export is not possible
    pub error: Option<String>,
    pub sdk_version: Option<String>,
    /// Absolute path the RPM will be written to
    pub export_path: Option<String>,
    pub binaries: Vec<TemplateBinary>,
    pub shared_home: Option<String>,
    pub shared_src: Option<String>,
}

// ============================================================================
// list_targets
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTargetsArgs {
    /// Sailfish SDK install path (overrides the preset and --sdk-path)
    #[serde(default)]
    pub sdk_path: Option<String>,
    /// Path to a TOML preset file
    #[serde(default)]
    pub preset_file: Option<String>,
    /// Inline preset
    #[serde(default)]
    pub preset: Option<ExportPreset>,
}

#[derive(Debug, Serialize)]
pub struct ListTargetsResult {
    pub targets: Vec<TargetInfo>,
    /// Target each architecture would be exported with
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct TargetInfo {
    /// Full target name (e.g., "SailfishOS-3.2.1.20-armv7hl")
    pub name: String,
    pub arch: TargetArch,
    /// Target release (e.g., "3.2.1.20")
    pub version: String,
}

// ============================================================================
// export
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportArgs {
    /// Path to a TOML preset file (default: --preset)
    #[serde(default)]
    pub preset_file: Option<String>,
    /// Inline preset, takes precedence over preset_file
    #[serde(default)]
    pub preset: Option<ExportPreset>,
    /// Use the debug template binaries
    #[serde(default)]
    pub debug: bool,
    /// Architecture to export for ("armv7hl" or "i486"); first available when omitted
    #[serde(default)]
    pub arch: Option<TargetArch>,
    /// Run rpmbuild in the build engine after staging the buildroot
    #[serde(default)]
    pub build_rpm: bool,
    /// Run export in background
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportResult {
    pub success: bool,
    /// Export ID for background exports
    pub export_id: Option<String>,
    pub message: String,
    pub outcome: Option<ExportOutcome>,
    /// Export duration in milliseconds
    pub duration_ms: Option<u64>,
}

// ============================================================================
// export_status
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportStatusArgs {
    /// Export ID from background export
    pub export_id: String,
}

#[derive(Debug, Serialize)]
pub struct ExportStatusResult {
    /// Status: "running", "complete", "failed"
    pub status: String,
    /// Elapsed time while running
    pub progress: Option<String>,
    /// Export result if complete
    pub outcome: Option<ExportOutcome>,
    /// Error message if failed
    pub error: Option<String>,
}
