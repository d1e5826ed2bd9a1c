//! Godot project metadata read from `project.godot`

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExportError, Result};

pub const PROJECT_FILE: &str = "project.godot";

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub dir: PathBuf,
    pub name: String,
    pub icon: Option<PathBuf>,
}

impl Project {
    pub fn open(dir: &Path) -> Result<Self> {
        let file = dir.join(PROJECT_FILE);
        if !file.exists() {
            return Err(ExportError::ProjectNotFound(file));
        }
        let content = std::fs::read_to_string(&file)?;
        let project = Self::parse(dir, &content);
        debug!("Opened project '{}' in {}", project.name, dir.display());
        Ok(project)
    }

    /// Project without a readable `project.godot`, named after its directory
    pub fn unnamed(dir: &Path) -> Self {
        Self::parse(dir, "")
    }

    fn parse(dir: &Path, content: &str) -> Self {
        let mut section = String::new();
        let mut name = None;
        let mut icon = None;

        for line in content.lines() {
            let line = line.trim();
            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = header.to_string();
                continue;
            }
            if section != "application" {
                continue;
            }
            if let Some(value) = line.strip_prefix("config/name=") {
                name = Some(unquote(value).to_string());
            } else if let Some(value) = line.strip_prefix("config/icon=") {
                icon = Some(resolve_resource(dir, unquote(value)));
            }
        }

        let name = name.filter(|n| !n.is_empty()).unwrap_or_else(|| {
            dir.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("game")
                .to_string()
        });

        Self {
            dir: dir.to_path_buf(),
            name,
            icon,
        }
    }
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

/// Map a `res://` path onto the project directory
pub fn resolve_resource(project_dir: &Path, path: &str) -> PathBuf {
    match path.strip_prefix("res://") {
        Some(rel) => project_dir.join(rel),
        None => PathBuf::from(path),
    }
}
