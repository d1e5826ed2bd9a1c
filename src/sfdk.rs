//! Wrappers around the `sfdk` build-engine CLI

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::platform::{BuildTarget, TargetArch};
use crate::process::{run_tool, ToolOutput};

/// Oldest target release shipping SDL 2.0.9
pub const MINIMUM_TARGET_VERSION: [u32; 2] = [3, 1];

static TARGET_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SailfishOS-([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)-(armv7hl|i486)\b")
        .expect("valid target regex")
});

/// Extract build targets from `sfdk tools list` output, in order of appearance
pub fn parse_targets(output: &str) -> Vec<BuildTarget> {
    let mut targets: Vec<BuildTarget> = Vec::new();
    for caps in TARGET_NAME.captures_iter(output) {
        let version: Option<Vec<u32>> = (1..=4).map(|i| caps[i].parse().ok()).collect();
        let Some([a, b, c, d]) = version.as_deref() else {
            debug!("Wrong match: {}", &caps[0]);
            continue;
        };
        let arch = caps[5].parse().unwrap_or(TargetArch::Unknown);
        let target = BuildTarget::new([*a, *b, *c, *d], arch);
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}

/// Newest usable target for `arch`
pub fn select_target(targets: &[BuildTarget], arch: TargetArch) -> Option<BuildTarget> {
    targets
        .iter()
        .filter(|t| t.arch == arch)
        .filter(|t| {
            let usable = [t.version[0], t.version[1]] >= MINIMUM_TARGET_VERSION;
            if !usable {
                warn!("Too old Sailfish target {}", t.target_name());
            }
            usable
        })
        .max_by_key(|t| t.version)
        .cloned()
}

/// Run `sfdk tools list` and parse the available build targets
pub async fn list_targets(sfdk: &Path) -> Result<(Vec<BuildTarget>, ToolOutput)> {
    let args = vec!["tools".to_string(), "list".to_string()];
    let output = run_tool(sfdk, &args, None).await?;
    if !output.success() {
        warn!(
            "Building of Sailfish RPM failed, check output for the error.\n{}",
            output.text()
        );
        return Err(ExportError::ToolFailed {
            tool: "sfdk tools list".to_string(),
            code: output.exit_code,
        });
    }

    let targets = parse_targets(&output.text());
    info!("sfdk reports {} build targets", targets.len());
    Ok((targets, output))
}

/// Run rpmbuild inside the build engine for `target`.
///
/// `spec` is relative to `buildroot`, which becomes the rpm `_topdir`. The
/// buildroot must lie inside a folder shared with the build engine.
pub async fn build_rpm(
    sfdk: &Path,
    target: &BuildTarget,
    buildroot: &Path,
    spec: &Path,
) -> Result<(ToolOutput, Vec<PathBuf>)> {
    let args = vec![
        "-c".to_string(),
        format!("target={}", target.target_name()),
        "build-shell".to_string(),
        "rpmbuild".to_string(),
        "--define".to_string(),
        "_topdir %(pwd)".to_string(),
        "-bb".to_string(),
        spec.to_string_lossy().to_string(),
    ];
    info!("Running rpmbuild for {}", target.target_name());

    let output = run_tool(sfdk, &args, Some(buildroot)).await?;
    if !output.success() {
        warn!(
            "Building of Sailfish RPM failed, check output for the error.\n{}",
            output.text()
        );
        return Err(ExportError::ToolFailed {
            tool: "sfdk build-shell rpmbuild".to_string(),
            code: output.exit_code,
        });
    }

    let rpms = find_rpms(buildroot, target.arch)?;
    Ok((output, rpms))
}

/// RPMs produced under `<buildroot>/RPMS/<arch>/`
pub fn find_rpms(buildroot: &Path, arch: TargetArch) -> Result<Vec<PathBuf>> {
    let dir = buildroot.join("RPMS").join(arch.as_str());
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut rpms: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "rpm"))
        .collect();
    rpms.sort();
    Ok(rpms)
}
