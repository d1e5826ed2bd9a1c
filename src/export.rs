//! SailfishOS export pipeline
//!
//! `can_export` runs every precondition check and returns the validated
//! context; `export_project` uses it to lay out the RPM buildroot:
//!
//! ```text
//! <export_path>_buildroot/
//!   rpm/<name>.spec
//!   BUILD/usr/bin/<name>
//!   BUILD/usr/share/<name>/<name>.pck
//!   BUILD/usr/share/<name>/<name>.png
//!   BUILD/usr/share/applications/<name>.desktop
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::pack::{GodotPackExporter, PackExporter, PrebuiltPackExporter};
use crate::paths;
use crate::platform::{BuildTarget, NativePackage, TargetArch};
use crate::preset::ExportPreset;
use crate::project::{self, Project};
use crate::sdk::Sdk;
use crate::sfdk;
use crate::templates;

/// A template binary that passed validation
#[derive(Debug, Clone, Serialize)]
pub struct TemplateBinary {
    pub arch: TargetArch,
    pub path: PathBuf,
}

/// Validated export context produced by [`Exporter::can_export`]
#[derive(Debug, Clone, Serialize)]
pub struct ExportCheck {
    pub binaries: Vec<TemplateBinary>,
    pub sdk: Sdk,
    pub export_path: PathBuf,
}

impl ExportCheck {
    pub fn binary(&self, arch: TargetArch) -> Option<&Path> {
        self.binaries
            .iter()
            .find(|b| b.arch == arch)
            .map(|b| b.path.as_path())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressStep {
    pub percent: u8,
    pub label: String,
}

/// Progress of one export, logged as it advances
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportProgress {
    pub steps: Vec<ProgressStep>,
}

impl ExportProgress {
    pub fn step(&mut self, label: impl Into<String>, percent: u8) {
        let label = label.into();
        info!("[{:>3}%] {}", percent, label);
        self.steps.push(ProgressStep { percent, label });
    }
}

/// File locations inside the RPM buildroot
#[derive(Debug, Clone, Serialize)]
pub struct BuildrootLayout {
    pub root: PathBuf,
    pub rpm_dir: PathBuf,
    pub spec: PathBuf,
    pub binary: PathBuf,
    pub share_dir: PathBuf,
    pub pack: PathBuf,
    pub icon: PathBuf,
    pub desktop: PathBuf,
}

impl BuildrootLayout {
    pub fn new(export_path: &Path, name: &str) -> Self {
        let root = paths::buildroot_path(export_path);
        let rpm_dir = root.join("rpm");
        let usr = root.join("BUILD").join("usr");
        let share_dir = usr.join("share").join(name);
        Self {
            spec: rpm_dir.join(format!("{}.spec", name)),
            binary: usr.join("bin").join(name),
            pack: share_dir.join(format!("{}.pck", name)),
            icon: share_dir.join(format!("{}.png", name)),
            desktop: usr.join("share").join("applications").join(format!("{}.desktop", name)),
            rpm_dir,
            share_dir,
            root,
        }
    }

    pub fn create(&self) -> Result<()> {
        let dirs = [
            Some(self.rpm_dir.as_path()),
            self.binary.parent(),
            Some(self.share_dir.as_path()),
            self.desktop.parent(),
        ];
        for dir in dirs.into_iter().flatten() {
            std::fs::create_dir_all(dir).map_err(|e| {
                warn!("Cant create directory {}: {}", dir.display(), e);
                ExportError::CreateDir(dir.to_path_buf())
            })?;
        }
        Ok(())
    }

    /// Spec path relative to the buildroot, as rpmbuild sees it
    pub fn spec_relative(&self) -> PathBuf {
        self.spec.strip_prefix(&self.root).unwrap_or(&self.spec).to_path_buf()
    }
}

/// Result of a finished export
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub target: String,
    pub arch: TargetArch,
    pub package: NativePackage,
    pub layout: BuildrootLayout,
    pub icon_staged: bool,
    pub rpm_path: Option<PathBuf>,
    pub progress: ExportProgress,
    pub sfdk_output: Vec<String>,
}

/// Runs SailfishOS exports for one project
#[derive(Clone)]
pub struct Exporter {
    config: Config,
    pack: Arc<dyn PackExporter>,
}

impl Exporter {
    pub fn new(config: Config, pack: Arc<dyn PackExporter>) -> Self {
        Self { config, pack }
    }

    /// Exporter using a prebuilt pack when configured, Godot otherwise
    pub fn from_config(config: Config) -> Self {
        let pack: Arc<dyn PackExporter> = match &config.pack_file {
            Some(source) => Arc::new(PrebuiltPackExporter {
                source: source.clone(),
            }),
            None => Arc::new(GodotPackExporter {
                godot_bin: config.godot_bin.clone(),
                project_dir: config.project_dir().unwrap_or_else(|_| PathBuf::from(".")),
                preset_name: config.preset_name.clone(),
            }),
        };
        Self::new(config, pack)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn project_dir(&self) -> Result<PathBuf> {
        Ok(self.config.project_dir()?)
    }

    fn project(&self) -> Result<Project> {
        let dir = self.project_dir()?;
        match Project::open(&dir) {
            Ok(project) => Ok(project),
            Err(ExportError::ProjectNotFound(file)) => {
                warn!("No {} found, naming package after the directory", file.display());
                Ok(Project::unnamed(&dir))
            }
            Err(e) => Err(e),
        }
    }

    /// SDK root from the preset, falling back to the configured default
    fn sdk_root(&self, preset: &ExportPreset) -> Result<PathBuf> {
        let from_preset = preset.sailfish_sdk.sdk_path.trim();
        if !from_preset.is_empty() {
            return Ok(PathBuf::from(from_preset));
        }
        self.config
            .sdk_path
            .clone()
            .ok_or_else(|| ExportError::SdkNotFound(PathBuf::new()))
    }

    pub fn locate_sdk(&self, preset: &ExportPreset) -> Result<Sdk> {
        let root = self.sdk_root(preset)?;
        Sdk::locate(&root, self.config.sdk_config_root.as_deref())
    }

    /// Check every precondition of an export
    pub fn can_export(&self, preset: &ExportPreset, debug: bool) -> Result<ExportCheck> {
        let configured: Vec<(TargetArch, &str)> = TargetArch::EXPORTABLE
            .iter()
            .filter_map(|&arch| preset.template_binary(arch, debug).map(|p| (arch, p)))
            .collect();
        if configured.is_empty() {
            return Err(ExportError::MissingTemplates);
        }

        let binaries: Vec<TemplateBinary> = configured
            .into_iter()
            .filter_map(|(arch, path)| match std::fs::File::open(path) {
                Ok(_) if Path::new(path).is_file() => Some(TemplateBinary {
                    arch,
                    path: PathBuf::from(path),
                }),
                Ok(_) => {
                    warn!("Template binary for {} is not a file: {}", arch, path);
                    None
                }
                Err(e) => {
                    warn!("Template binary for {} not readable: {}: {}", arch, path, e);
                    None
                }
            })
            .collect();
        if binaries.is_empty() {
            return Err(ExportError::TemplatesNotFound);
        }

        let sdk = self.locate_sdk(preset)?;

        if preset.export_path.trim().is_empty() {
            return Err(ExportError::InvalidConfig("export_path is empty".to_string()));
        }
        let export_path = paths::absolute_export_path(&preset.export_path, &self.project_dir()?);
        if !sdk.shared.contains(&export_path) {
            return Err(ExportError::ExportPathOutsideShared {
                shared_home: sdk.shared.shared_home.clone(),
                shared_src: sdk.shared.shared_src.clone(),
            });
        }

        preset.validate()?;

        Ok(ExportCheck {
            binaries,
            sdk,
            export_path,
        })
    }

    /// Build targets the SDK's build engine offers
    pub async fn list_targets(&self, preset: &ExportPreset) -> Result<Vec<BuildTarget>> {
        let sdk = self.locate_sdk(preset)?;
        let (targets, _) = sfdk::list_targets(&sdk.sfdk).await?;
        Ok(targets)
    }

    /// Export the project and stage the RPM buildroot; with `build_rpm` also
    /// run rpmbuild in the build engine and copy the package to the export path.
    pub async fn export_project(
        &self,
        preset: &ExportPreset,
        debug: bool,
        arch: Option<TargetArch>,
        build_rpm: bool,
    ) -> Result<ExportOutcome> {
        let mut progress = ExportProgress::default();

        progress.step("checking export template binaries", 5);
        let check = self.can_export(preset, debug)?;
        progress.step("found export template binaries", 20);

        progress.step("check sfdk targets", 25);
        let (targets, tool_output) = sfdk::list_targets(&check.sdk.sfdk).await?;
        let (target, binary) = choose_target(&check, &targets, arch)?;
        info!("Exporting for {}", target.target_name());

        let project = self.project()?;
        let package = NativePackage {
            name: preset.package_name(&project.name),
            launcher_name: preset.launcher_name(&project.name),
            version: preset.version.string.clone(),
            release: preset.version.release.to_string(),
            description: preset.description(),
            target: target.clone(),
        };

        let layout = BuildrootLayout::new(&check.export_path, &package.name);
        layout.create()?;

        progress.step("create *.pck file", 35);
        self.pack.export_pack(preset, debug, &layout.pack).await?;

        let icon = self.icon_source(preset, &project);

        progress.step(format!("generate {}.spec file", package.name), 45);
        let date = chrono::Local::now().date_naive();
        std::fs::write(&layout.spec, templates::render_spec(&package, icon.is_some(), date))?;

        progress.step(format!("generate {}.desktop file", package.name), 55);
        std::fs::write(&layout.desktop, templates::render_desktop(&package, icon.is_some()))?;

        progress.step("copy binary and icon", 65);
        std::fs::copy(&binary, &layout.binary)?;
        make_executable(&layout.binary)?;
        if let Some(icon) = &icon {
            std::fs::copy(icon, &layout.icon)?;
        }

        let rpm_path = if build_rpm {
            progress.step("build rpm package", 80);
            let (_, rpms) =
                sfdk::build_rpm(&check.sdk.sfdk, &target, &layout.root, &layout.spec_relative()).await?;
            let rpm = rpms
                .first()
                .ok_or_else(|| ExportError::RpmNotProduced(layout.root.join("RPMS")))?;
            std::fs::copy(rpm, &check.export_path)?;
            Some(check.export_path.clone())
        } else {
            None
        };

        progress.step("done", 100);

        Ok(ExportOutcome {
            target: target.target_name(),
            arch: target.arch,
            package,
            layout,
            icon_staged: icon.is_some(),
            rpm_path,
            progress,
            sfdk_output: tool_output.lines,
        })
    }

    /// Icon from the preset, else the project icon; unreadable icons are skipped
    fn icon_source(&self, preset: &ExportPreset, project: &Project) -> Option<PathBuf> {
        let configured = preset.package.icon.trim();
        let icon = if configured.is_empty() {
            project.icon.clone()?
        } else {
            project::resolve_resource(&project.dir, configured)
        };
        if icon.is_file() {
            Some(icon)
        } else {
            warn!("Icon {} not found, packaging without icon", icon.display());
            None
        }
    }
}

/// Pick the target to build: the requested arch, or the first exportable
/// arch with both a template binary and a usable build target.
fn choose_target(
    check: &ExportCheck,
    targets: &[BuildTarget],
    requested: Option<TargetArch>,
) -> Result<(BuildTarget, PathBuf)> {
    let candidates = match requested {
        Some(arch) => vec![arch],
        None => TargetArch::EXPORTABLE.to_vec(),
    };

    let mut reasons = Vec::new();
    for arch in candidates {
        let Some(binary) = check.binary(arch) else {
            info!("No {} template binary", arch);
            reasons.push(format!("no {} template binary", arch));
            continue;
        };
        match sfdk::select_target(targets, arch) {
            Some(target) => return Ok((target, binary.to_path_buf())),
            None => reasons.push(format!("no {} target >= 3.1 in sfdk", arch)),
        }
    }
    Err(ExportError::NoBuildTarget(reasons.join(", ")))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{sfdk_path, tests::fake_sdk};
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    /// Writes a fixed pack instead of running Godot
    struct FakePack;

    #[async_trait]
    impl PackExporter for FakePack {
        async fn export_pack(&self, _preset: &ExportPreset, _debug: bool, path: &Path) -> Result<()> {
            fs::write(path, b"GDPC")?;
            Ok(())
        }
    }

    struct Fixture {
        tmp: TempDir,
        exporter: Exporter,
        preset: ExportPreset,
    }

    /// Project, SDK and templates laid out under one temp dir that is also
    /// the SDK shared home
    fn fixture(release: &str) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let (sdk_root, config_root) = fake_sdk(tmp.path(), release, tmp.path());

        let project_dir = tmp.path().join("dodge");
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(
            project_dir.join(project::PROJECT_FILE),
            "[application]\nconfig/name=\"Dodge the Creeps\"\nconfig/icon=\"res://icon.png\"\n",
        )
        .unwrap();
        fs::write(project_dir.join("icon.png"), b"PNG").unwrap();

        let templates = tmp.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("godot.arm"), b"ELF").unwrap();

        let mut preset = ExportPreset::default();
        preset.export_path = "../out/dodge.rpm".to_string();
        preset.sailfish_sdk.sdk_path = sdk_root.to_string_lossy().to_string();
        preset.custom_binary.arm = templates.join("godot.arm").to_string_lossy().to_string();

        let config = Config {
            project_path: Some(project_dir),
            sdk_config_root: Some(config_root),
            ..Config::default()
        };

        Fixture {
            exporter: Exporter::new(config, Arc::new(FakePack)),
            tmp,
            preset,
        }
    }

    #[cfg(unix)]
    fn install_fake_sfdk(sdk_root: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let sfdk = sfdk_path(sdk_root);
        fs::write(&sfdk, script).unwrap();
        fs::set_permissions(&sfdk, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_layout_paths() {
        let layout = BuildrootLayout::new(Path::new("/home/u/out/game.rpm"), "harbour-game");
        assert_eq!(layout.root, PathBuf::from("/home/u/out/game.rpm_buildroot"));
        assert_eq!(layout.spec, PathBuf::from("/home/u/out/game.rpm_buildroot/rpm/harbour-game.spec"));
        assert_eq!(
            layout.binary,
            PathBuf::from("/home/u/out/game.rpm_buildroot/BUILD/usr/bin/harbour-game")
        );
        assert_eq!(
            layout.pack,
            PathBuf::from("/home/u/out/game.rpm_buildroot/BUILD/usr/share/harbour-game/harbour-game.pck")
        );
        assert_eq!(layout.spec_relative(), PathBuf::from("rpm/harbour-game.spec"));
    }

    #[test]
    fn test_can_export_ok() {
        let f = fixture("3.2.6");
        let check = f.exporter.can_export(&f.preset, false).unwrap();
        assert_eq!(check.binaries.len(), 1);
        assert!(check.binary(TargetArch::Armv7hl).is_some());
        assert!(check.binary(TargetArch::I486).is_none());
        assert_eq!(check.export_path, f.tmp.path().join("out/dodge.rpm"));
    }

    #[test]
    fn test_can_export_missing_templates() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        preset.custom_binary.arm.clear();
        let err = f.exporter.can_export(&preset, false).unwrap_err();
        assert!(err.is_missing_templates());
    }

    #[test]
    fn test_can_export_debug_uses_debug_binaries() {
        let f = fixture("3.2.6");
        let err = f.exporter.can_export(&f.preset, true).unwrap_err();
        assert!(err.is_missing_templates());
    }

    #[test]
    fn test_can_export_unreadable_templates() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        preset.custom_binary.arm = "/nonexistent/godot.arm".to_string();
        let err = f.exporter.can_export(&preset, false).unwrap_err();
        assert!(matches!(err, ExportError::TemplatesNotFound));
    }

    #[test]
    fn test_can_export_rejects_directory_template() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        preset.custom_binary.arm = f.tmp.path().join("templates").to_string_lossy().to_string();
        let err = f.exporter.can_export(&preset, false).unwrap_err();
        assert!(matches!(err, ExportError::TemplatesNotFound));
    }

    #[test]
    fn test_can_export_rejects_invalid_version() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        preset.version.string = "1.0-rc1".to_string();
        let err = f.exporter.can_export(&preset, false).unwrap_err();
        assert!(matches!(err, ExportError::InvalidConfig(_)));
    }

    #[test]
    fn test_layout_create_fails_under_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let layout = BuildrootLayout::new(&blocker.join("game.rpm"), "harbour-game");
        let err = layout.create().unwrap_err();
        assert!(matches!(err, ExportError::CreateDir(_)));
        assert!(err.to_string().starts_with("Cant create directory"));
    }

    #[test]
    fn test_can_export_drops_unreadable_template() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        preset.custom_binary.x86 = "/nonexistent/godot.x86".to_string();
        let check = f.exporter.can_export(&preset, false).unwrap();
        assert_eq!(check.binaries.len(), 1);
    }

    #[test]
    fn test_can_export_sdk_from_config_default() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        let sdk_root = PathBuf::from(&preset.sailfish_sdk.sdk_path);
        preset.sailfish_sdk.sdk_path.clear();

        let err = f.exporter.can_export(&preset, false).unwrap_err();
        assert!(matches!(err, ExportError::SdkNotFound(_)));

        let config = Config {
            sdk_path: Some(sdk_root),
            ..f.exporter.config().clone()
        };
        let exporter = Exporter::new(config, Arc::new(FakePack));
        assert!(exporter.can_export(&preset, false).is_ok());
    }

    #[test]
    fn test_can_export_old_sdk() {
        let f = fixture("3.0.6");
        let err = f.exporter.can_export(&f.preset, false).unwrap_err();
        assert!(matches!(err, ExportError::SdkTooOld { .. }));
    }

    #[test]
    fn test_can_export_outside_shared_home() {
        let f = fixture("3.2.6");
        let mut preset = f.preset.clone();
        preset.export_path = "/definitely/elsewhere/dodge.rpm".to_string();
        let err = f.exporter.can_export(&preset, false).unwrap_err();
        assert!(matches!(err, ExportError::ExportPathOutsideShared { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_project_stages_buildroot() {
        let f = fixture("3.2.6");
        install_fake_sfdk(
            Path::new(&f.preset.sailfish_sdk.sdk_path),
            "#!/bin/sh\necho 'SailfishOS-3.2.1.20                 sdk-provided'\n\
             echo '├── SailfishOS-3.2.1.20-armv7hl     sdk-provided'\n\
             echo '└── SailfishOS-3.2.1.20-i486        sdk-provided'\n",
        );

        let outcome = f.exporter.export_project(&f.preset, false, None, false).await.unwrap();

        assert_eq!(outcome.target, "SailfishOS-3.2.1.20-armv7hl");
        assert_eq!(outcome.package.name, "harbour-dodge-the-creeps");
        assert_eq!(outcome.package.launcher_name, "Dodge the Creeps");
        assert!(outcome.icon_staged);
        assert!(outcome.rpm_path.is_none());
        assert_eq!(outcome.progress.steps.last().unwrap().percent, 100);
        assert_eq!(outcome.sfdk_output.len(), 3);

        let layout = &outcome.layout;
        assert_eq!(fs::read(&layout.pack).unwrap(), b"GDPC");
        assert_eq!(fs::read(&layout.binary).unwrap(), b"ELF");
        assert_eq!(fs::read(&layout.icon).unwrap(), b"PNG");

        let spec = fs::read_to_string(&layout.spec).unwrap();
        assert!(spec.contains("Name:       harbour-dodge-the-creeps"));
        assert!(spec.contains("BuildArch:  armv7hl"));

        let desktop = fs::read_to_string(&layout.desktop).unwrap();
        assert!(desktop.contains("Name=Dodge the Creeps"));

        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&layout.binary).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_project_no_matching_target() {
        let f = fixture("3.2.6");
        install_fake_sfdk(
            Path::new(&f.preset.sailfish_sdk.sdk_path),
            "#!/bin/sh\necho 'SailfishOS-3.2.1.20-i486 sdk-provided'\n",
        );

        let err = f.exporter.export_project(&f.preset, false, None, false).await.unwrap_err();
        assert!(matches!(err, ExportError::NoBuildTarget(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_project_sfdk_failure() {
        let f = fixture("3.2.6");
        install_fake_sfdk(Path::new(&f.preset.sailfish_sdk.sdk_path), "#!/bin/sh\nexit 2\n");

        let err = f.exporter.export_project(&f.preset, false, None, false).await.unwrap_err();
        assert!(matches!(err, ExportError::ToolFailed { code: 2, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_project_builds_rpm() {
        let f = fixture("3.2.6");
        // `tools list` prints targets, `build-shell` fakes rpmbuild output in the cwd
        install_fake_sfdk(
            Path::new(&f.preset.sailfish_sdk.sdk_path),
            "#!/bin/sh\n\
             if [ \"$1\" = tools ]; then echo 'SailfishOS-3.2.1.20-armv7hl'; exit 0; fi\n\
             mkdir -p RPMS/armv7hl && echo rpm > RPMS/armv7hl/harbour-dodge-the-creeps-1.0.0-1.armv7hl.rpm\n",
        );

        let outcome = f.exporter.export_project(&f.preset, false, None, true).await.unwrap();
        let rpm = outcome.rpm_path.unwrap();
        assert_eq!(rpm, f.tmp.path().join("out/dodge.rpm"));
        assert_eq!(fs::read_to_string(rpm).unwrap(), "rpm\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_project_rpmbuild_without_package() {
        let f = fixture("3.2.6");
        install_fake_sfdk(
            Path::new(&f.preset.sailfish_sdk.sdk_path),
            "#!/bin/sh\n\
             if [ \"$1\" = tools ]; then echo 'SailfishOS-3.2.1.20-armv7hl'; exit 0; fi\n\
             exit 0\n",
        );

        let err = f.exporter.export_project(&f.preset, false, None, true).await.unwrap_err();
        assert!(matches!(err, ExportError::RpmNotProduced(ref dir) if dir.ends_with("RPMS")));
        assert!(!f.tmp.path().join("out/dodge.rpm").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_project_rpmbuild_failure() {
        let f = fixture("3.2.6");
        install_fake_sfdk(
            Path::new(&f.preset.sailfish_sdk.sdk_path),
            "#!/bin/sh\n\
             if [ \"$1\" = tools ]; then echo 'SailfishOS-3.2.1.20-armv7hl'; exit 0; fi\n\
             exit 1\n",
        );

        let err = f.exporter.export_project(&f.preset, false, None, true).await.unwrap_err();
        assert!(matches!(err, ExportError::ToolFailed { code: 1, .. }));
    }
}
