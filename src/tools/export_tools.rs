//! RMCP 0.3.2 implementation for SailfishOS export MCP tools
//!
//! Provides 6 tools wrapping SDK validation, sfdk and RPM buildroot staging.

use rmcp::{
    tool, tool_router, tool_handler, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    ErrorData as McpError,
    service::RequestContext,
    RoleServer,
};
use tracing::{debug, error, info};
use std::future::Future;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use super::types::*;
use crate::config::Config;
use crate::error::ExportError;
use crate::export::{ExportOutcome, Exporter};
use crate::pack::PackExporter;
use crate::platform::{self, TargetArch};
use crate::preset::ExportPreset;
use crate::sfdk;

/// Export state for background exports
#[derive(Debug, Clone)]
pub struct ExportState {
    pub status: ExportStatus,
    pub started_at: Instant,
    pub outcome: Option<ExportOutcome>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Running,
    Complete,
    Failed,
}

impl std::fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// SailfishOS export tool handler with all 6 tools
#[derive(Clone)]
pub struct SailfishExportToolHandler {
    #[allow(dead_code)]
    tool_router: ToolRouter<SailfishExportToolHandler>,
    config: Config,
    exporter: Exporter,
    exports: Arc<RwLock<HashMap<String, ExportState>>>,
}

impl SailfishExportToolHandler {
    pub fn new(config: Config) -> Self {
        let exporter = Exporter::from_config(config.clone());
        Self::with_exporter(config, exporter)
    }

    /// Handler whose data packs come from `pack` instead of the configured source
    pub fn with_pack_exporter(config: Config, pack: Arc<dyn PackExporter>) -> Self {
        let exporter = Exporter::new(config.clone(), pack);
        Self::with_exporter(config, exporter)
    }

    fn with_exporter(config: Config, exporter: Exporter) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config,
            exporter,
            exports: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Preset from inline args, an explicit file, or the configured default file
    fn load_preset(
        &self,
        inline: Option<ExportPreset>,
        file: Option<&str>,
    ) -> Result<Option<ExportPreset>, McpError> {
        if let Some(preset) = inline {
            return Ok(Some(preset));
        }
        let path = match file {
            Some(f) => Path::new(f).to_path_buf(),
            None => match &self.config.preset_file {
                Some(p) => p.clone(),
                None => return Ok(None),
            },
        };
        debug!("Loading preset from {}", path.display());
        ExportPreset::load(&path).map(Some).map_err(|e| {
            McpError::invalid_params(format!("Failed to load preset {}: {}", path.display(), e), None)
        })
    }

    fn require_preset(
        &self,
        inline: Option<ExportPreset>,
        file: Option<&str>,
    ) -> Result<ExportPreset, McpError> {
        self.load_preset(inline, file)?.ok_or_else(|| {
            McpError::invalid_params(
                "No export preset given. Pass 'preset' or 'preset_file', or start the server with --preset.".to_string(),
                None,
            )
        })
    }
}

impl Default for SailfishExportToolHandler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn to_mcp_error(e: ExportError) -> McpError {
    if e.is_configuration() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("Serialization error: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl SailfishExportToolHandler {
    // =============================================================================
    // Export Tools (6 tools)
    // =============================================================================

    #[tool(description = "Describe the SailfishOS export platform: name, feature tags and package extensions")]
    async fn platform_info(&self, Parameters(_args): Parameters<PlatformInfoArgs>) -> Result<CallToolResult, McpError> {
        to_json(&PlatformInfoResult {
            name: platform::PLATFORM_NAME.to_string(),
            os_name: platform::OS_NAME.to_string(),
            features: platform::platform_features(),
            binary_extensions: platform::binary_extensions(),
        })
    }

    #[tool(description = "List the options of a SailfishOS export preset with their defaults")]
    async fn export_options(&self, Parameters(_args): Parameters<ExportOptionsArgs>) -> Result<CallToolResult, McpError> {
        to_json(&ExportOptionsResult {
            options: platform::export_options(),
        })
    }

    #[tool(description = "Check whether a preset can be exported: template binaries, SDK version, sfdk and shared folders")]
    async fn can_export(&self, Parameters(args): Parameters<CanExportArgs>) -> Result<CallToolResult, McpError> {
        let preset = self.require_preset(args.preset, args.preset_file.as_deref())?;
        debug!("Checking export preset (debug: {})", args.debug);

        let result = match self.exporter.can_export(&preset, args.debug) {
            Ok(check) => CanExportResult {
                can_export: true,
                missing_templates: false,
                error: None,
                sdk_version: Some(check.sdk.release.version.to_string()),
                export_path: Some(check.export_path.display().to_string()),
                binaries: check.binaries,
                shared_home: Some(check.sdk.shared.shared_home),
                shared_src: Some(check.sdk.shared.shared_src),
            },
            Err(e) => {
                info!("Export not possible: {}", e);
                CanExportResult {
                    can_export: false,
                    missing_templates: e.is_missing_templates(),
                    error: Some(e.to_string()),
                    sdk_version: None,
                    export_path: None,
                    binaries: Vec::new(),
                    shared_home: None,
                    shared_src: None,
                }
            }
        };

        to_json(&result)
    }

    #[tool(description = "List SailfishOS build targets installed in the SDK build engine (runs 'sfdk tools list')")]
    async fn list_targets(&self, Parameters(args): Parameters<ListTargetsArgs>) -> Result<CallToolResult, McpError> {
        let mut preset = self
            .load_preset(args.preset, args.preset_file.as_deref())?
            .unwrap_or_default();
        if let Some(sdk_path) = args.sdk_path {
            preset.sailfish_sdk.sdk_path = sdk_path;
        }

        let targets = self.exporter.list_targets(&preset).await.map_err(to_mcp_error)?;

        let selected = TargetArch::EXPORTABLE
            .iter()
            .filter_map(|&arch| sfdk::select_target(&targets, arch))
            .map(|t| t.target_name())
            .collect();

        let targets: Vec<TargetInfo> = targets
            .iter()
            .map(|t| TargetInfo {
                name: t.target_name(),
                arch: t.arch,
                version: t.version.map(|v| v.to_string()).join("."),
            })
            .collect();

        info!("Found {} SailfishOS build targets", targets.len());
        to_json(&ListTargetsResult { targets, selected })
    }

    #[tool(description = "Export the project for SailfishOS: data pack, binary, desktop file and RPM spec in <export_path>_buildroot, optionally running rpmbuild")]
    async fn export(&self, Parameters(args): Parameters<ExportArgs>) -> Result<CallToolResult, McpError> {
        let preset = self.require_preset(args.preset, args.preset_file.as_deref())?;
        debug!("Exporting (debug: {}, arch: {:?}, build_rpm: {})", args.debug, args.arch, args.build_rpm);

        if args.background {
            let export_id = uuid::Uuid::new_v4().to_string();

            {
                let mut exports = self.exports.write().await;
                exports.insert(export_id.clone(), ExportState {
                    status: ExportStatus::Running,
                    started_at: Instant::now(),
                    outcome: None,
                    error: None,
                });
            }

            // Spawn background task
            let exports = self.exports.clone();
            let exporter = self.exporter.clone();
            let export_id_clone = export_id.clone();
            let (debug, arch, build_rpm) = (args.debug, args.arch, args.build_rpm);

            tokio::spawn(async move {
                let start = Instant::now();
                let task = tokio::spawn(async move {
                    exporter.export_project(&preset, debug, arch, build_rpm).await
                });
                // a panicking export must not leave the state at "running"
                let result = match task.await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(e) => Err(format!("Export task aborted: {}", e)),
                };

                let mut exports = exports.write().await;
                if let Some(state) = exports.get_mut(&export_id_clone) {
                    match result {
                        Ok(outcome) => {
                            state.status = ExportStatus::Complete;
                            state.outcome = Some(outcome);
                        }
                        Err(e) => {
                            error!("Background export {} failed: {}", export_id_clone, e);
                            state.status = ExportStatus::Failed;
                            state.error = Some(e);
                        }
                    }
                }
                info!("Background export {} finished in {:?}", export_id_clone, start.elapsed());
            });

            info!("Started background export: {}", export_id);
            return to_json(&ExportResult {
                success: true,
                export_id: Some(export_id),
                message: "Export started in background".to_string(),
                outcome: None,
                duration_ms: None,
            });
        }

        let start = Instant::now();
        let outcome = self
            .exporter
            .export_project(&preset, args.debug, args.arch, args.build_rpm)
            .await
            .map_err(|e| {
                error!("Export failed: {}", e);
                to_mcp_error(e)
            })?;
        let duration = start.elapsed();

        info!("Export for {} completed in {:?}", outcome.target, duration);
        to_json(&ExportResult {
            success: true,
            export_id: None,
            message: format!("Buildroot staged in {}", outcome.layout.root.display()),
            outcome: Some(outcome),
            duration_ms: Some(duration.as_millis() as u64),
        })
    }

    #[tool(description = "Check status of a background export")]
    async fn export_status(&self, Parameters(args): Parameters<ExportStatusArgs>) -> Result<CallToolResult, McpError> {
        debug!("Checking export status for '{}'", args.export_id);

        let exports = self.exports.read().await;

        let result = match exports.get(&args.export_id) {
            Some(state) => ExportStatusResult {
                status: state.status.to_string(),
                progress: if state.status == ExportStatus::Running {
                    Some(format!("Exporting ({:?} elapsed)", state.started_at.elapsed()))
                } else {
                    None
                },
                outcome: state.outcome.clone(),
                error: state.error.clone(),
            },
            None => {
                return Err(McpError::invalid_params(
                    format!("Export ID not found: {}", args.export_id),
                    None,
                ));
            }
        };

        to_json(&result)
    }
}


#[tool_handler]
impl ServerHandler for SailfishExportToolHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "SailfishOS Export MCP Server - Package Godot projects as SailfishOS RPMs. \
                 6 tools available: platform_info, export_options, can_export, list_targets, export, export_status.".to_string()
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!("SailfishOS Export MCP server initialized with 6 tools");
        Ok(self.get_info())
    }
}
