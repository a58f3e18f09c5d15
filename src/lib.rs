//! leveler - Group dependent tasks into parallel execution levels
//!
//! Given a list of named tasks and the names they depend on, leveler
//! places every task in the earliest level after all of its dependencies.
//! Tasks sharing a level are independent of each other and can run in
//! parallel.
//!
//! ```
//! use leveler::{resolve, Task};
//!
//! let tasks = vec![
//!     Task::new("A"),
//!     Task::with_dependencies("B", ["A"]),
//!     Task::with_dependencies("C", ["A"]),
//!     Task::with_dependencies("D", ["B", "C"]),
//! ];
//!
//! let levels = resolve(&tasks).unwrap();
//! assert_eq!(levels, vec![vec!["A"], vec!["B", "C"], vec!["D"]]);
//! ```

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{
    resolve, DependencyGraph, LevelResolver, Resolution, ResolutionError, ResolverOptions, Task,
};
