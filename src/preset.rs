//! SailfishOS export preset
//!
//! A preset carries the option values listed in [`crate::platform::export_options`].
//! It can be passed inline as JSON or loaded from a TOML file whose sections
//! follow the option groups:
//!
//! ```toml
//! export_path = "../builds/game.rpm"
//!
//! [sailfish_sdk]
//! sdk_path = "/home/user/SailfishOS"
//!
//! [custom_binary]
//! arm = "/templates/godot.sailfish.opt.arm"
//!
//! [version]
//! release = 3
//! string = "1.2.0"
//!
//! [package]
//! name = "harbour-$genname"
//! ```

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::path::Path;

use crate::error::{ExportError, Result};
use crate::platform::{
    TargetArch, DEFAULT_DESCRIPTION, DEFAULT_PACKAGE_NAME, DEFAULT_VERSION, OPT_LAUNCHER_NAME,
    OPT_PACKAGE_NAME, OPT_VERSION_RELEASE, OPT_VERSION_STRING,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SdkOptions {
    /// Sailfish SDK install directory
    pub sdk_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CustomBinaryOptions {
    /// Release template binary for armv7hl
    pub arm: String,
    /// Debug template binary for armv7hl
    pub arm_debug: String,
    /// Release template binary for i486
    pub x86: String,
    /// Debug template binary for i486
    pub x86_debug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VersionOptions {
    /// RPM release number
    pub release: u32,
    /// RPM version string
    pub string: String,
}

impl Default for VersionOptions {
    fn default() -> Self {
        Self {
            release: 1,
            string: DEFAULT_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PackageOptions {
    /// RPM package name, `$genname` is replaced with a name generated from the project
    pub name: String,
    /// Launcher (desktop entry) name, project name when blank
    pub game_name: String,
    /// Package description
    pub description: String,
    /// Launcher icon (PNG), project icon when blank
    pub icon: String,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            game_name: String::new(),
            description: DEFAULT_DESCRIPTION.to_string(),
            icon: String::new(),
        }
    }
}

/// Values of one SailfishOS export preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExportPreset {
    /// Output path of the RPM, relative paths resolve against the project directory
    pub export_path: String,
    pub sailfish_sdk: SdkOptions,
    pub custom_binary: CustomBinaryOptions,
    pub version: VersionOptions,
    pub package: PackageOptions,
}

impl ExportPreset {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Template binary configured for an architecture, `None` when unset
    pub fn template_binary(&self, arch: TargetArch, debug: bool) -> Option<&str> {
        let bins = &self.custom_binary;
        let path = match (arch, debug) {
            (TargetArch::Armv7hl, false) => &bins.arm,
            (TargetArch::Armv7hl, true) => &bins.arm_debug,
            (TargetArch::I486, false) => &bins.x86,
            (TargetArch::I486, true) => &bins.x86_debug,
            (TargetArch::Unknown, _) => return None,
        };
        let path = path.trim();
        (!path.is_empty()).then_some(path)
    }

    /// RPM package name with `$genname` expanded from the project name
    pub fn package_name(&self, project_name: &str) -> String {
        let name = self.package.name.trim();
        let name = if name.is_empty() { DEFAULT_PACKAGE_NAME } else { name };
        name.replace("$genname", &generate_name(project_name))
    }

    pub fn launcher_name(&self, project_name: &str) -> String {
        let name = self.package.game_name.trim();
        if name.is_empty() {
            project_name.to_string()
        } else {
            name.to_string()
        }
    }

    pub fn description(&self) -> String {
        let text = self.package.description.trim();
        if text.is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            text.to_string()
        }
    }

    /// Reject values that would break the generated spec or desktop file
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ExportError::InvalidConfig(msg)) };

        if self.version.release < 1 {
            return invalid(format!("{} must be at least 1", OPT_VERSION_RELEASE));
        }
        let version = self.version.string.trim();
        if version.is_empty() {
            return invalid(format!("{} is empty", OPT_VERSION_STRING));
        }
        if version.contains(|c: char| c == '-' || c.is_whitespace() || c.is_control()) {
            return invalid(format!(
                "{} '{}' may not contain '-' or whitespace",
                OPT_VERSION_STRING, version
            ));
        }
        if self.package.name.trim().contains(|c: char| c.is_whitespace() || c.is_control()) {
            return invalid(format!("{} may not contain whitespace", OPT_PACKAGE_NAME));
        }
        if self.package.game_name.contains(|c: char| c.is_control()) {
            return invalid(format!("{} must be a single line", OPT_LAUNCHER_NAME));
        }
        Ok(())
    }
}

/// Package-safe name derived from a project name ("My Game!" -> "my-game")
pub fn generate_name(project_name: &str) -> String {
    let mut out = String::with_capacity(project_name.len());
    let mut pending_dash = false;
    for c in project_name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        "game".to_string()
    } else {
        out
    }
}
