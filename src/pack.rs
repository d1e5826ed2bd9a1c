//! Data pack (`.pck`) export
//!
//! Pack creation belongs to the engine. [`PackExporter`] is the seam the
//! export pipeline calls through; the default implementation drives the
//! Godot editor in headless mode.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ExportError, Result};
use crate::preset::ExportPreset;
use crate::process::run_tool;

#[async_trait]
pub trait PackExporter: Send + Sync {
    /// Write the project's data pack to `path`
    async fn export_pack(&self, preset: &ExportPreset, debug: bool, path: &Path) -> Result<()>;
}

/// Exports the pack with `godot --headless --export-pack`
#[derive(Debug, Clone)]
pub struct GodotPackExporter {
    pub godot_bin: PathBuf,
    pub project_dir: PathBuf,
    /// Name of the Godot export preset that defines the pack contents
    pub preset_name: String,
}

impl GodotPackExporter {
    pub fn command_args(&self, path: &Path) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--path".to_string(),
            self.project_dir.to_string_lossy().to_string(),
            "--export-pack".to_string(),
            self.preset_name.clone(),
            path.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl PackExporter for GodotPackExporter {
    /// `--export-pack` writes the same pack for debug and release exports;
    /// the flag only shows up in the log.
    async fn export_pack(&self, _preset: &ExportPreset, debug: bool, path: &Path) -> Result<()> {
        let mode = if debug { "debug" } else { "release" };
        info!("Exporting {} pack with {}", mode, self.godot_bin.display());
        let output = run_tool(&self.godot_bin, &self.command_args(path), Some(&self.project_dir)).await?;
        if !output.success() {
            return Err(ExportError::PackFailed(format!(
                "{} (godot exited with {})",
                path.display(),
                output.exit_code
            )));
        }
        if !path.is_file() {
            return Err(ExportError::PackFailed(format!("{} was not created", path.display())));
        }
        Ok(())
    }
}

/// Uses a pack that was exported beforehand
#[derive(Debug, Clone)]
pub struct PrebuiltPackExporter {
    pub source: PathBuf,
}

#[async_trait]
impl PackExporter for PrebuiltPackExporter {
    async fn export_pack(&self, _preset: &ExportPreset, _debug: bool, path: &Path) -> Result<()> {
        info!("Copying prebuilt pack {}", self.source.display());
        tokio::fs::copy(&self.source, path)
            .await
            .map_err(|e| ExportError::PackFailed(format!("{}: {}", self.source.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_godot_command_args() {
        let exporter = GodotPackExporter {
            godot_bin: PathBuf::from("godot"),
            project_dir: PathBuf::from("/proj"),
            preset_name: "SailfishOS".to_string(),
        };
        assert_eq!(
            exporter.command_args(Path::new("/out/game.pck")),
            vec!["--headless", "--path", "/proj", "--export-pack", "SailfishOS", "/out/game.pck"]
        );
    }

    #[tokio::test]
    async fn test_prebuilt_copy() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("game.pck");
        std::fs::write(&source, b"GDPC").unwrap();
        let dest = tmp.path().join("out.pck");

        let exporter = PrebuiltPackExporter { source };
        exporter.export_pack(&ExportPreset::default(), false, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"GDPC");
    }

    #[tokio::test]
    async fn test_prebuilt_missing_source() {
        let tmp = TempDir::new().unwrap();
        let exporter = PrebuiltPackExporter {
            source: tmp.path().join("missing.pck"),
        };
        let err = exporter
            .export_pack(&ExportPreset::default(), false, &tmp.path().join("out.pck"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::PackFailed(_)));
    }

    #[tokio::test]
    async fn test_godot_missing_binary() {
        let tmp = TempDir::new().unwrap();
        let exporter = GodotPackExporter {
            godot_bin: PathBuf::from("/nonexistent/godot_xyz"),
            project_dir: tmp.path().to_path_buf(),
            preset_name: "SailfishOS".to_string(),
        };
        let err = exporter
            .export_pack(&ExportPreset::default(), false, &tmp.path().join("out.pck"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::ToolLaunch { .. }));
    }

    #[cfg(unix)]
    fn fake_godot(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let godot = dir.join("godot");
        std::fs::write(&godot, script).unwrap();
        std::fs::set_permissions(&godot, std::fs::Permissions::from_mode(0o755)).unwrap();
        godot
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_godot_writes_pack() {
        let tmp = TempDir::new().unwrap();
        // last argument is the pack path
        let godot = fake_godot(
            tmp.path(),
            "#!/bin/sh\nfor last; do :; done\nprintf GDPC > \"$last\"\n",
        );
        let exporter = GodotPackExporter {
            godot_bin: godot,
            project_dir: tmp.path().to_path_buf(),
            preset_name: "SailfishOS".to_string(),
        };
        let dest = tmp.path().join("game.pck");
        exporter.export_pack(&ExportPreset::default(), true, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"GDPC");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_godot_success_without_pack() {
        let tmp = TempDir::new().unwrap();
        let godot = fake_godot(tmp.path(), "#!/bin/sh\nexit 0\n");
        let exporter = GodotPackExporter {
            godot_bin: godot,
            project_dir: tmp.path().to_path_buf(),
            preset_name: "SailfishOS".to_string(),
        };
        let err = exporter
            .export_pack(&ExportPreset::default(), false, &tmp.path().join("game.pck"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("was not created"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_godot_failure_exit() {
        let tmp = TempDir::new().unwrap();
        let godot = fake_godot(tmp.path(), "#!/bin/sh\necho 'ERROR: preset not found' >&2\nexit 1\n");
        let exporter = GodotPackExporter {
            godot_bin: godot,
            project_dir: tmp.path().to_path_buf(),
            preset_name: "Missing".to_string(),
        };
        let err = exporter
            .export_pack(&ExportPreset::default(), false, &tmp.path().join("game.pck"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::PackFailed(ref msg) if msg.contains("exited with 1")));
    }
}
