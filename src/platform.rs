//! SailfishOS platform identity, build targets and export option table

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;

pub const PLATFORM_NAME: &str = "SailfishOS";
pub const OS_NAME: &str = "SailfishOS";

/// Features a SailfishOS export advertises to the project
pub fn platform_features() -> Vec<String> {
    vec!["mobile".to_string(), OS_NAME.to_string()]
}

pub fn binary_extensions() -> Vec<String> {
    vec!["rpm".to_string()]
}

/// CPU architecture of a SailfishOS build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
    Armv7hl,
    #[serde(alias = "x86")]
    I486,
    Unknown,
}

impl TargetArch {
    /// Architectures a package can be exported for, in preference order
    pub const EXPORTABLE: [TargetArch; 2] = [TargetArch::Armv7hl, TargetArch::I486];

    /// RPM architecture name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armv7hl => "armv7hl",
            Self::I486 => "i486",
            Self::Unknown => "noarch",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "armv7hl" | "arm" => Ok(Self::Armv7hl),
            "i486" | "x86" => Ok(Self::I486),
            "noarch" | "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown SailfishOS architecture: {}", other)),
        }
    }
}

/// A build target provided by the SDK build engine (e.g. SailfishOS-3.2.1.20-armv7hl)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    pub name: String,
    pub version: [u32; 4],
    pub arch: TargetArch,
}

impl BuildTarget {
    pub fn new(version: [u32; 4], arch: TargetArch) -> Self {
        Self {
            name: PLATFORM_NAME.to_string(),
            version,
            arch,
        }
    }

    /// Full target name as used by `sfdk -c target=...`
    pub fn target_name(&self) -> String {
        let [a, b, c, d] = self.version;
        format!("{}-{}.{}.{}.{}-{}", self.name, a, b, c, d, self.arch)
    }
}

impl Default for BuildTarget {
    fn default() -> Self {
        Self::new([3, 2, 0, 12], TargetArch::Unknown)
    }
}

/// Everything needed to render the packaging files for one RPM
#[derive(Debug, Clone, Serialize)]
pub struct NativePackage {
    pub target: BuildTarget,
    pub name: String,
    pub launcher_name: String,
    pub version: String,
    pub release: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionHint {
    None,
    GlobalDir,
    GlobalFile,
    Range,
    PlaceholderText,
    MultilineText,
}

/// One configurable export option
#[derive(Debug, Clone, Serialize)]
pub struct ExportOption {
    pub name: &'static str,
    pub kind: OptionKind,
    pub hint: OptionHint,
    pub hint_string: &'static str,
    pub default: serde_json::Value,
}

impl ExportOption {
    fn string(name: &'static str, hint: OptionHint, hint_string: &'static str, default: &str) -> Self {
        Self {
            name,
            kind: OptionKind::String,
            hint,
            hint_string,
            default: serde_json::Value::from(default),
        }
    }
}

pub const OPT_SDK_PATH: &str = "sailfish_sdk/sdk_path";
pub const OPT_BINARY_ARM: &str = "custom_binary/arm";
pub const OPT_BINARY_ARM_DEBUG: &str = "custom_binary/arm_debug";
pub const OPT_BINARY_X86: &str = "custom_binary/x86";
pub const OPT_BINARY_X86_DEBUG: &str = "custom_binary/x86_debug";
pub const OPT_VERSION_RELEASE: &str = "version/release";
pub const OPT_VERSION_STRING: &str = "version/string";
pub const OPT_PACKAGE_NAME: &str = "package/name";
pub const OPT_LAUNCHER_NAME: &str = "package/game_name";
pub const OPT_DESCRIPTION: &str = "package/description";
pub const OPT_ICON: &str = "package/icon";

pub const DEFAULT_PACKAGE_NAME: &str = "harbour-$genname";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_DESCRIPTION: &str = "Default package description";

/// The option table shown for a SailfishOS export preset
pub fn export_options() -> Vec<ExportOption> {
    vec![
        ExportOption::string(OPT_SDK_PATH, OptionHint::GlobalDir, "", ""),
        ExportOption::string(OPT_BINARY_ARM, OptionHint::GlobalFile, "", ""),
        ExportOption::string(OPT_BINARY_ARM_DEBUG, OptionHint::GlobalFile, "", ""),
        ExportOption::string(OPT_BINARY_X86, OptionHint::GlobalFile, "", ""),
        ExportOption::string(OPT_BINARY_X86_DEBUG, OptionHint::GlobalFile, "", ""),
        ExportOption {
            name: OPT_VERSION_RELEASE,
            kind: OptionKind::Int,
            hint: OptionHint::Range,
            hint_string: "1,40096,1,or_greater",
            default: serde_json::Value::from(1),
        },
        ExportOption::string(OPT_VERSION_STRING, OptionHint::PlaceholderText, DEFAULT_VERSION, DEFAULT_VERSION),
        ExportOption::string(OPT_PACKAGE_NAME, OptionHint::PlaceholderText, DEFAULT_PACKAGE_NAME, DEFAULT_PACKAGE_NAME),
        ExportOption::string(OPT_LAUNCHER_NAME, OptionHint::PlaceholderText, "Game Name [default if blank]", ""),
        ExportOption::string(OPT_DESCRIPTION, OptionHint::MultilineText, "", DEFAULT_DESCRIPTION),
        ExportOption::string(OPT_ICON, OptionHint::GlobalFile, "*.png", ""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_text() {
        assert_eq!(TargetArch::Armv7hl.as_str(), "armv7hl");
        assert_eq!(TargetArch::I486.as_str(), "i486");
        assert_eq!(TargetArch::Unknown.as_str(), "noarch");
    }

    #[test]
    fn test_arch_parse_aliases() {
        assert_eq!("x86".parse::<TargetArch>().unwrap(), TargetArch::I486);
        assert_eq!("ARM".parse::<TargetArch>().unwrap(), TargetArch::Armv7hl);
        assert!("aarch64".parse::<TargetArch>().is_err());
    }

    #[test]
    fn test_arch_deserialize_alias() {
        let arch: TargetArch = serde_json::from_str("\"x86\"").unwrap();
        assert_eq!(arch, TargetArch::I486);
    }

    #[test]
    fn test_target_name() {
        let target = BuildTarget::new([3, 2, 1, 20], TargetArch::Armv7hl);
        assert_eq!(target.target_name(), "SailfishOS-3.2.1.20-armv7hl");
    }

    #[test]
    fn test_default_target() {
        assert_eq!(BuildTarget::default().target_name(), "SailfishOS-3.2.0.12-noarch");
    }

    #[test]
    fn test_export_options_table() {
        let options = export_options();
        let names: Vec<&str> = options.iter().map(|o| o.name).collect();
        assert!(names.contains(&OPT_SDK_PATH));
        assert!(names.contains(&OPT_BINARY_X86_DEBUG));

        let release = options.iter().find(|o| o.name == OPT_VERSION_RELEASE).unwrap();
        assert_eq!(release.kind, OptionKind::Int);
        assert_eq!(release.default, serde_json::json!(1));

        let name = options.iter().find(|o| o.name == OPT_PACKAGE_NAME).unwrap();
        assert_eq!(name.default, serde_json::json!("harbour-$genname"));
    }

    #[test]
    fn test_platform_features() {
        assert_eq!(platform_features(), vec!["mobile", "SailfishOS"]);
        assert_eq!(binary_extensions(), vec!["rpm"]);
    }
}
