//! Sailfish SDK discovery and validation
//!
//! An SDK install is usable when:
//! 1. the install directory exists
//! 2. its `sdk-release` file names a release >= 3.0.7
//! 3. `bin/sfdk` is present
//! 4. the `libsfdk/buildengines.xml` configuration can be read, which tells
//!    us the SharedHome / SharedSrc folders the build engine can see

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, trace};

use crate::error::{ExportError, Result};
use crate::paths;

pub const SDK_RELEASE_FILE: &str = "sdk-release";
pub const DEFAULT_SDK_CONFIG_DIR: &str = "SailfishSDK";
pub const BUILDENGINES_FILE: &str = "buildengines.xml";

pub const MINIMUM_SDK_VERSION: SdkVersion = SdkVersion {
    major: 3,
    minor: 0,
    patch: 7,
};

static RELEASE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\.([0-9]+)\.([0-9]+)").expect("valid release regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SdkVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parsed contents of `<sdk>/sdk-release`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdkRelease {
    pub version: SdkVersion,
    /// SDK_RELEASE value as written in the file
    pub raw: String,
    /// Name of the SDK directory below the user config dir
    pub config_dir: String,
}

pub fn parse_sdk_release(text: &str) -> Result<SdkRelease> {
    let mut version = None;
    let mut config_dir = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "SDK_RELEASE" => {
                let matches: Vec<_> = RELEASE_VERSION.captures_iter(value).collect();
                let [caps] = matches.as_slice() else {
                    return Err(ExportError::SdkReleaseUnparsable(value.to_string()));
                };
                let part = |i: usize| {
                    caps[i]
                        .parse::<u32>()
                        .map_err(|_| ExportError::SdkReleaseUnparsable(value.to_string()))
                };
                version = Some((
                    SdkVersion {
                        major: part(1)?,
                        minor: part(2)?,
                        patch: part(3)?,
                    },
                    value.to_string(),
                ));
            }
            "SDK_CONFIG_DIR" if !value.is_empty() => config_dir = Some(value.to_string()),
            _ => {}
        }
    }

    let (version, raw) = version
        .ok_or_else(|| ExportError::SdkReleaseUnparsable("no SDK_RELEASE entry".to_string()))?;

    Ok(SdkRelease {
        version,
        raw,
        config_dir: config_dir.unwrap_or_else(|| DEFAULT_SDK_CONFIG_DIR.to_string()),
    })
}

pub fn check_version(release: &SdkRelease) -> Result<()> {
    if release.version < MINIMUM_SDK_VERSION {
        return Err(ExportError::SdkTooOld {
            minimum: MINIMUM_SDK_VERSION.to_string(),
            current: release.raw.clone(),
        });
    }
    Ok(())
}

/// Path of the `sfdk` CLI inside an SDK install
pub fn sfdk_path(sdk_root: &Path) -> PathBuf {
    if cfg!(windows) {
        sdk_root.join("bin").join("sfdk.exe")
    } else {
        sdk_root.join("bin").join("sfdk")
    }
}

/// Directory the SDK keeps its user configuration under
pub fn config_root() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join(".config"))
    } else {
        dirs::config_dir()
    }
}

pub fn buildengines_path(config_root: &Path, config_dir: &str) -> PathBuf {
    config_root.join(config_dir).join("libsfdk").join(BUILDENGINES_FILE)
}

/// Host folders shared with the build engine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SharedPaths {
    pub shared_home: String,
    pub shared_src: String,
}

impl SharedPaths {
    /// True when the build engine can see `path` through one of the shared folders
    pub fn contains(&self, path: &Path) -> bool {
        paths::is_within(path, &self.shared_home) || paths::is_within(path, &self.shared_src)
    }
}

/// Pull SharedHome / SharedSrc out of `buildengines.xml`.
///
/// Every `<value key="...">` element is considered; later entries win.
pub fn parse_shared_paths(xml: &str) -> std::result::Result<SharedPaths, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut shared = SharedPaths::default();
    let mut pending_key: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                pending_key = None;
                if e.name().as_ref() != b"value" {
                    trace!("Node skipping is: {}", String::from_utf8_lossy(e.name().as_ref()));
                    continue;
                }
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"key" {
                        pending_key = Some(attr.unescape_value()?.into_owned());
                    }
                }
            }
            Event::Text(text) => {
                if let Some(key) = pending_key.take() {
                    let value = text.unescape()?.into_owned();
                    match key.as_str() {
                        "SharedHome" => shared.shared_home = value,
                        "SharedSrc" => shared.shared_src = value,
                        _ => {}
                    }
                }
            }
            Event::End(_) => pending_key = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shared)
}

/// A validated SDK install
#[derive(Debug, Clone, Serialize)]
pub struct Sdk {
    pub root: PathBuf,
    pub release: SdkRelease,
    pub sfdk: PathBuf,
    pub buildengines: PathBuf,
    pub shared: SharedPaths,
}

impl Sdk {
    /// Validate an SDK install. `config_root` overrides the platform config directory.
    pub fn locate(root: &Path, config_root_override: Option<&Path>) -> Result<Self> {
        if root.as_os_str().is_empty() || !root.is_dir() {
            return Err(ExportError::SdkNotFound(root.to_path_buf()));
        }

        let release_file = root.join(SDK_RELEASE_FILE);
        let text = std::fs::read_to_string(&release_file)
            .map_err(|_| ExportError::SdkReleaseMissing(root.to_path_buf()))?;
        let release = parse_sdk_release(&text)?;
        check_version(&release)?;
        debug!("SDK release {} (config dir {})", release.version, release.config_dir);

        let sfdk = sfdk_path(root);
        if !sfdk.is_file() {
            return Err(ExportError::SfdkNotFound(sfdk));
        }

        let base = match config_root_override {
            Some(dir) => dir.to_path_buf(),
            None => config_root().ok_or_else(|| {
                ExportError::InvalidConfig("no user config directory found".to_string())
            })?,
        };
        let buildengines = buildengines_path(&base, &release.config_dir);
        let xml = std::fs::read_to_string(&buildengines).map_err(|e| ExportError::BuildEnginesConfig {
            path: buildengines.clone(),
            reason: e.to_string(),
        })?;
        let shared = parse_shared_paths(&xml).map_err(|e| ExportError::BuildEnginesConfig {
            path: buildengines.clone(),
            reason: e.to_string(),
        })?;

        info!(
            "Sailfish SDK {} at {} (SharedHome: {}, SharedSrc: {})",
            release.version,
            root.display(),
            shared.shared_home,
            shared.shared_src
        );

        Ok(Self {
            root: root.to_path_buf(),
            release,
            sfdk,
            buildengines,
            shared,
        })
    }
}
