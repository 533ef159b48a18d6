//! Ordered task list with a pinned sentinel and a "recent" slot.
//!
//! Index 0 always holds [`NO_TASK`]. Index 1 holds the most recently
//! added or selected task, so the list reads newest-first after the sentinel.

use serde::{Deserialize, Serialize};

/// Name of the sentinel task that cannot be removed or moved.
pub const NO_TASK: &str = "No task";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            tasks: vec![Task {
                name: NO_TASK.to_string(),
            }],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    /// Insert `name` right after the sentinel. Returns false on an exact duplicate.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.tasks.insert(
            1,
            Task {
                name: name.to_string(),
            },
        );
        true
    }

    /// Move `name` to the recent slot, inserting it there if unknown.
    ///
    /// The sentinel is never moved.
    pub fn promote(&mut self, name: &str) {
        if name == NO_TASK {
            return;
        }
        match self.position(name) {
            Some(index) => {
                let task = self.tasks.remove(index);
                self.tasks.insert(1, task);
            }
            None => {
                self.add(name);
            }
        }
    }

    /// Case-insensitive substring filter, preserving list order.
    pub fn search(&self, needle: &str) -> impl Iterator<Item = &Task> + '_ {
        let needle = needle.to_lowercase();
        self.tasks
            .iter()
            .filter(move |t| t.name.to_lowercase().contains(&needle))
    }

    /// Restore the sentinel invariant on a list read from a snapshot.
    fn normalized(mut tasks: Vec<Task>) -> Self {
        tasks.retain(|t| t.name != NO_TASK);
        let mut seen = std::collections::HashSet::new();
        tasks.retain(|t| seen.insert(t.name.clone()));
        tasks.insert(
            0,
            Task {
                name: NO_TASK.to_string(),
            },
        );
        Self { tasks }
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Deserialize<'de> for TaskList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tasks = Vec::<Task>::deserialize(deserializer)?;
        Ok(Self::normalized(tasks))
    }
}
