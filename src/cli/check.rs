//! The `check` command: validate a task file without printing an order

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::{LevelResolver, ResolverOptions};
use crate::storage::load_tasks;

/// Validate the task file at `input`
pub fn run(output: &Output, input: &Path, options: ResolverOptions) -> Result<()> {
    let tasks = load_tasks(input)?;
    let resolution = LevelResolver::with_options(options).resolve(&tasks)?;

    let widest = resolution.levels.iter().map(Vec::len).max().unwrap_or(0);

    if output.is_json() {
        output.data(&serde_json::json!({
            "valid": true,
            "tasks": tasks.len(),
            "levels": resolution.len(),
            "widest_level": widest,
        }));
    } else {
        output.success(&format!(
            "OK: {} task(s) in {} level(s), at most {} in parallel",
            tasks.len(),
            resolution.len(),
            widest
        ));
    }

    Ok(())
}
