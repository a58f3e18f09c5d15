//! Domain models for leveler
//!
//! Contains the task model and the resolution logic without any I/O concerns.

mod graph;
mod resolver;
mod task;

pub use graph::DependencyGraph;
pub use resolver::{
    resolve, LevelResolver, Resolution, ResolutionError, ResolvedTask, ResolverOptions,
};
pub use task::Task;
