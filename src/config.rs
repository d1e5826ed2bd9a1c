//! Configuration for the sailfish-export MCP server

use std::path::PathBuf;
use clap::Parser;

use crate::paths;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "sailfish-export")]
#[command(about = "MCP server for packaging Godot projects as SailfishOS RPMs")]
#[command(version)]
pub struct Args {
    /// Default Sailfish SDK install path (used when a preset leaves sailfish_sdk/sdk_path empty)
    #[arg(long)]
    pub sdk_path: Option<PathBuf>,

    /// Godot project directory (default: current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Default export preset file (TOML)
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Godot editor binary used to export the data pack
    #[arg(long, default_value = "godot")]
    pub godot: PathBuf,

    /// Name of the Godot export preset passed to --export-pack
    #[arg(long, default_value = "SailfishOS")]
    pub preset_name: String,

    /// Use an already exported .pck instead of running Godot
    #[arg(long)]
    pub pack_file: Option<PathBuf>,

    /// Override the directory holding the SDK configuration (default: platform config dir)
    #[arg(long)]
    pub sdk_config_root: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone)]
pub struct Config {
    pub sdk_path: Option<PathBuf>,
    pub project_path: Option<PathBuf>,
    pub preset_file: Option<PathBuf>,
    pub godot_bin: PathBuf,
    pub preset_name: String,
    pub pack_file: Option<PathBuf>,
    pub sdk_config_root: Option<PathBuf>,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            sdk_path: args.sdk_path.clone(),
            project_path: args.project.clone(),
            preset_file: args.preset.clone(),
            godot_bin: args.godot.clone(),
            preset_name: args.preset_name.clone(),
            pack_file: args.pack_file.clone(),
            sdk_config_root: args.sdk_config_root.clone(),
        }
    }

    /// Absolute project directory; relative `--project` values resolve
    /// against the current directory, which is also the default
    pub fn project_dir(&self) -> std::io::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.project_path {
            Some(path) => paths::normalize(&cwd.join(path)),
            None => cwd,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sdk_path: None,
            project_path: None,
            preset_file: None,
            godot_bin: PathBuf::from("godot"),
            preset_name: "SailfishOS".to_string(),
            pack_file: None,
            sdk_config_root: None,
        }
    }
}
