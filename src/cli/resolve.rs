//! The `resolve` command: print tasks grouped into execution levels

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::{LevelResolver, Resolution, ResolvedTask, ResolverOptions};
use crate::storage::load_tasks;

const BANNER: &str = "======================";

/// Resolve the task file at `input` and print the levels
pub fn run(output: &Output, input: &Path, options: ResolverOptions, trace: bool) -> Result<()> {
    let tasks = load_tasks(input)?;
    tracing::debug!(input = %input.display(), tasks = tasks.len(), ?options, "resolving");

    let resolution = LevelResolver::with_options(options).resolve(&tasks)?;
    tracing::debug!(
        levels = resolution.len(),
        passes = resolution.passes,
        "resolution complete"
    );

    if output.is_json() {
        let mut body = serde_json::json!({
            "levels": resolution.levels,
            "passes": resolution.passes,
        });
        if trace {
            body["steps"] = serde_json::to_value(&resolution.steps)?;
        }
        output.data(&body);
    } else {
        output.line(render_text(&resolution, trace).trim_end_matches('\n'));
    }

    Ok(())
}

/// Renders the task order, optionally preceded by one line per placement
pub fn render_text(resolution: &Resolution, trace: bool) -> String {
    let mut text = String::new();

    if trace {
        for step in &resolution.steps {
            text.push_str(&render_step(step));
            text.push('\n');
        }
    }

    if resolution.is_empty() {
        text.push_str("No tasks to resolve.\n");
        return text;
    }

    text.push_str(BANNER);
    text.push_str("\nTASK ORDER\n");
    text.push_str(BANNER);
    text.push('\n');

    for level in &resolution.levels {
        text.push_str(&render_level(level));
        text.push('\n');
    }

    text
}

fn render_step(step: &ResolvedTask) -> String {
    format!("{} completed in iteration: {}", step.name, step.level)
}

/// Renders one level as `[A, B]`
pub fn render_level(level: &[String]) -> String {
    format!("[{}]", level.join(", "))
}
