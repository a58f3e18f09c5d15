//! Level resolution
//!
//! Groups tasks into levels so that every task lands exactly one level
//! after the highest level among its dependencies. Tasks without
//! dependencies share level 0. Resolution is a fixed-point computation:
//! each pass scans the unresolved tasks in input order and places every
//! task whose dependencies are all placed. A pass that places nothing
//! while tasks remain means the rest can never become eligible.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

use super::graph::DependencyGraph;
use super::task::Task;

/// Structural errors in a task list
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionError {
    #[error("Cyclic dependency detected, unresolved tasks: {}", .unresolved.join(", "))]
    CyclicDependency {
        /// Tasks that never became eligible, in input order
        unresolved: Vec<String>,
        /// Dependency cycles among the unresolved tasks
        cycles: Vec<Vec<String>>,
    },

    #[error("Task '{task}' depends on undeclared task '{missing}'")]
    UnknownDependency { task: String, missing: String },

    #[error("Duplicate task name: {name}")]
    DuplicateTask { name: String },

    #[error("Task '{task}' would be placed past the level ceiling of {ceiling}")]
    LevelCeilingExceeded { task: String, ceiling: usize },

    #[error("No tasks to resolve")]
    EmptyGraph,
}

/// Knobs for a [`LevelResolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Upper bound on the number of levels. `None` means unbounded.
    pub max_levels: Option<usize>,

    /// Reject references to undeclared tasks before resolving. When off,
    /// such tasks stay unresolved and are reported as a cycle.
    pub check_references: bool,

    /// Report an empty task list as [`ResolutionError::EmptyGraph`]
    pub reject_empty: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_levels: None,
            check_references: true,
            reject_empty: false,
        }
    }
}

/// A task placed during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTask {
    pub name: String,
    pub level: usize,
    /// The scan pass that placed the task
    pub pass: usize,
}

/// The outcome of a successful resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Task names grouped by level, in the order they were placed
    pub levels: Vec<Vec<String>>,

    /// Every placement, in resolution order
    pub steps: Vec<ResolvedTask>,

    /// Number of scan passes performed
    pub passes: usize,
}

impl Resolution {
    /// Returns the number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn into_levels(self) -> Vec<Vec<String>> {
        self.levels
    }
}

/// Computes leveled topological orderings
#[derive(Debug, Clone, Default)]
pub struct LevelResolver {
    options: ResolverOptions,
}

impl LevelResolver {
    /// Creates a resolver with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Groups `tasks` into levels
    pub fn resolve(&self, tasks: &[Task]) -> Result<Resolution, ResolutionError> {
        if tasks.is_empty() {
            if self.options.reject_empty {
                return Err(ResolutionError::EmptyGraph);
            }
            return Ok(Resolution::default());
        }

        let deps = self.index_dependencies(tasks)?;

        // Level each task was placed at, indexed like `tasks`; written once
        let mut completed_at: Vec<Option<usize>> = vec![None; tasks.len()];
        let mut levels: Vec<Vec<String>> = Vec::new();
        let mut steps: Vec<ResolvedTask> = Vec::with_capacity(tasks.len());
        let mut pass = 0;

        while steps.len() < tasks.len() {
            let mut placed = 0;

            for (idx, task) in tasks.iter().enumerate() {
                if completed_at[idx].is_some() {
                    continue;
                }

                let Some(level) = eligible_level(&deps[idx], &completed_at) else {
                    trace!(task = %task.name, pass, "waiting on dependencies");
                    continue;
                };

                if let Some(ceiling) = self.options.max_levels {
                    if level >= ceiling {
                        return Err(ResolutionError::LevelCeilingExceeded {
                            task: task.name.clone(),
                            ceiling,
                        });
                    }
                }

                debug!(task = %task.name, level, pass, "task completed");

                completed_at[idx] = Some(level);
                if levels.len() <= level {
                    levels.resize_with(level + 1, Vec::new);
                }
                levels[level].push(task.name.clone());
                steps.push(ResolvedTask {
                    name: task.name.clone(),
                    level,
                    pass,
                });
                placed += 1;
            }

            debug!(
                pass,
                placed,
                remaining = tasks.len() - steps.len(),
                "pass finished"
            );

            if placed == 0 {
                return Err(cycle_error(tasks, &completed_at));
            }

            pass += 1;
        }

        while levels.last().is_some_and(Vec::is_empty) {
            levels.pop();
        }

        Ok(Resolution {
            levels,
            steps,
            passes: pass,
        })
    }

    /// Maps every dependency name to the index of its task. Undeclared
    /// names map to `None` unless reference checking is on.
    fn index_dependencies(
        &self,
        tasks: &[Task],
    ) -> Result<Vec<Vec<Option<usize>>>, ResolutionError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            if index.insert(task.name.as_str(), idx).is_some() {
                return Err(ResolutionError::DuplicateTask {
                    name: task.name.clone(),
                });
            }
        }

        tasks
            .iter()
            .map(|task| {
                task.dependencies
                    .iter()
                    .map(|dep| match index.get(dep.as_str()) {
                        Some(&idx) => Ok(Some(idx)),
                        None if self.options.check_references => {
                            Err(ResolutionError::UnknownDependency {
                                task: task.name.clone(),
                                missing: dep.clone(),
                            })
                        }
                        None => Ok(None),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

/// Resolves `tasks` with default options and returns the levels
pub fn resolve(tasks: &[Task]) -> Result<Vec<Vec<String>>, ResolutionError> {
    LevelResolver::new().resolve(tasks).map(Resolution::into_levels)
}

/// Level for a task whose dependencies are all placed: one past the highest
/// dependency, or 0 with no dependencies. `None` while any is unplaced.
fn eligible_level(deps: &[Option<usize>], completed_at: &[Option<usize>]) -> Option<usize> {
    let mut highest: Option<usize> = None;
    for dep in deps {
        let level = (*dep).and_then(|d| completed_at[d])?;
        highest = Some(highest.map_or(level, |h| h.max(level)));
    }
    Some(highest.map_or(0, |h| h + 1))
}

fn cycle_error(tasks: &[Task], completed_at: &[Option<usize>]) -> ResolutionError {
    let unresolved: Vec<String> = tasks
        .iter()
        .zip(completed_at)
        .filter(|(_, level)| level.is_none())
        .map(|(task, _)| task.name.clone())
        .collect();

    let cycles = DependencyGraph::from_tasks(tasks).cycles();

    // Reported to the caller as an error; only traced here
    debug!(
        unresolved = unresolved.len(),
        cycles = cycles.len(),
        "no progress possible, cyclic dependency"
    );

    ResolutionError::CyclicDependency { unresolved, cycles }
}
