//! Task file loading
//!
//! A task file holds a single top-level `tasks` list:
//!
//! ```yaml
//! tasks:
//!   - name: compile
//!   - name: test
//!     dependencies: [compile]
//! ```
//!
//! Files ending in `.json` are parsed as JSON, everything else as YAML.
//! The path `-` reads YAML from stdin.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Task;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to read task file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid {format} task document: {message}")]
    Parse { format: TaskFormat, message: String },
}

/// Serialization format of a task file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFormat {
    #[default]
    Yaml,
    Json,
}

impl TaskFormat {
    /// Picks the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TaskFormat::Json,
            _ => TaskFormat::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFormat::Yaml => "YAML",
            TaskFormat::Json => "JSON",
        }
    }
}

impl std::fmt::Display for TaskFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct TaskDocument {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

/// Parses a task document
pub fn parse_tasks(content: &str, format: TaskFormat) -> Result<Vec<Task>, LoaderError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: TaskDocument = match format {
        TaskFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        TaskFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
    .map_err(|message| LoaderError::Parse { format, message })?;

    Ok(document.tasks.unwrap_or_default())
}

/// Loads tasks from a file, or from stdin when `path` is `-`
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| LoaderError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        return parse_tasks(&content, TaskFormat::Yaml)
            .context("Failed to parse tasks from stdin");
    }

    let content = fs::read_to_string(path).map_err(|source| LoaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let tasks = parse_tasks(&content, TaskFormat::from_path(path))
        .with_context(|| format!("Failed to parse task file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
    Ok(tasks)
}
