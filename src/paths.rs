//! Export path resolution and shared-folder containment checks

use std::path::{Component, Path, PathBuf};

/// Resolve a preset export path against the project directory.
///
/// Absolute paths are only normalized. For relative paths each `.` is dropped
/// and each `..` removes one trailing component of the project directory.
/// Purely lexical: nothing is read from disk.
pub fn absolute_export_path(export_path: &str, project_dir: &Path) -> PathBuf {
    let export = Path::new(export_path);
    if export.is_absolute() {
        return normalize(export);
    }
    normalize(&project_dir.join(export))
}

/// Lexically normalize a path, folding `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // no-op at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when `path` lies inside `base` (component-wise). An empty base never matches.
pub fn is_within(path: &Path, base: &str) -> bool {
    let base = base.trim();
    if base.is_empty() {
        return false;
    }
    normalize(path).starts_with(normalize(Path::new(base)))
}

/// Staging directory that sits next to the exported RPM
pub fn buildroot_path(export_path: &Path) -> PathBuf {
    let mut os = export_path.as_os_str().to_os_string();
    os.push("_buildroot");
    PathBuf::from(os)
}
