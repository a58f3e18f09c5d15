//! Configuration handling for leveler
//!
//! Configuration is stored in `leveler.toml` (project, discovered in the
//! current directory or an ancestor) and `~/.config/leveler/config.toml`
//! (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ResolverOptions;

/// File name of the project configuration
pub const CONFIG_FILE_NAME: &str = "leveler.toml";

/// Task file used when neither the command line nor the config names one
pub const DEFAULT_INPUT: &str = "input.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Resolver settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Safety ceiling on the number of levels
    pub max_levels: Option<usize>,

    /// Reject dependencies on undeclared tasks before resolving
    pub check_references: bool,

    /// Treat an empty task list as an error
    pub reject_empty: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let options = ResolverOptions::default();
        Self {
            max_levels: options.max_levels,
            check_references: options.check_references,
            reject_empty: options.reject_empty,
        }
    }
}

impl ResolverConfig {
    pub fn to_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_levels: self.max_levels,
            check_references: self.check_references,
            reject_empty: self.reject_empty,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Task file to resolve, relative to the config file
    pub input: PathBuf,

    /// Resolver settings
    pub resolver: ResolverConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            resolver: ResolverConfig::default(),
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    /// Directory holding the project config file, if one was found
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let config_file = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_config_file(&dir));

        match config_file {
            Some(path) => {
                let project = Self::load_project_config(&path)?;
                Ok(Self {
                    project,
                    global,
                    project_root: path.parent().map(Path::to_path_buf),
                })
            }
            None => Ok(Self {
                project: ProjectConfig::default(),
                global,
                project_root: None,
            }),
        }
    }

    /// Loads configuration with an explicit project config file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::Invalid(format!(
                "config file not found: {}",
                path.display()
            ))
            .into());
        }

        let global = Self::load_global()?;
        let project = Self::load_project_config(path)?;

        Ok(Self {
            project,
            global,
            project_root: path.parent().map(Path::to_path_buf),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "leveler", "leveler").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads and validates a project config file
    fn load_project_config(config_path: &Path) -> Result<ProjectConfig> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config = Self::parse_project_config(&content)
            .with_context(|| format!("Failed to load project config: {}", config_path.display()))?;

        tracing::debug!(path = %config_path.display(), "loaded project config");
        Ok(config)
    }

    /// Parses and validates project config text
    pub fn parse_project_config(content: &str) -> Result<ProjectConfig, ConfigError> {
        let config: ProjectConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.resolver.max_levels == Some(0) {
            return Err(ConfigError::Invalid(
                "resolver.max_levels must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Finds `leveler.toml` in `start` or its nearest ancestor
    pub fn find_config_file(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }

    /// Returns the task file to read, resolved against the project root
    pub fn input_path(&self) -> PathBuf {
        match &self.project_root {
            Some(root) if self.project.input.is_relative() => root.join(&self.project.input),
            _ => self.project.input.clone(),
        }
    }
}
