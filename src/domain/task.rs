//! Task domain model
//!
//! A task is a named unit of work with an ordered list of the names of the
//! tasks it depends on. Tasks carry nothing else: no cost, no priority.

use serde::{Deserialize, Deserializer, Serialize};

/// A named task and the names of the tasks it depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Unique name within one resolution run
    pub name: String,

    /// Names of other tasks that must run in an earlier level
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Creates a task with no dependencies
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Creates a task with the given dependencies
    pub fn with_dependencies<I, S>(name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

// `dependencies:` with no value parses as null in YAML
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
