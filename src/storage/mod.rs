//! # Storage Layer
//!
//! Reading task files and configuration from disk.
//!
//! ## Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | YAML (or JSON by extension) | `input.yml` by default, `-` for stdin |
//! | Project config | TOML | `leveler.toml` in the current directory or an ancestor |
//! | Global config | TOML | `~/.config/leveler/config.toml` |
//!
//! ## Key Types
//!
//! - [`load_tasks`] - Read a task file into [`Task`](crate::domain::Task) records
//! - [`Config`] - Project and global configuration

mod config;
mod loader;

pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat as ConfigOutputFormat, ProjectConfig,
    ResolverConfig, CONFIG_FILE_NAME, DEFAULT_INPUT,
};
pub use loader::{load_tasks, parse_tasks, LoaderError, TaskFormat};
