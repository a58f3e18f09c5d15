//! # Command-Line Interface
//!
//! The presenter: loads a task file, runs the resolver and prints the
//! result.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `resolve [FILE]` | Print tasks grouped into execution levels |
//! | `check [FILE]` | Validate a task file, print a summary |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Exit Status
//!
//! `0` on success, `2` for structural errors in the task graph (cycles,
//! undeclared dependencies, duplicates), `1` for anything else.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod check;
mod logging;
mod output;
mod resolve;

pub use app::{exit_status, run, Cli, Commands, ResolverArgs, EXIT_FAILURE, EXIT_STRUCTURAL};
pub use output::{Output, OutputFormat};
