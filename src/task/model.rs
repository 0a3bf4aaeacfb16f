#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::core::value::Value;

/// Stable task identifier. Tasks are always addressed by id, never by
/// reference, so undo can re-resolve them at apply time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(String);

impl TaskId {
    #[must_use]
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self(id.chars().take(8).collect())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A task: an id, its outline position, and one canonical value per
/// registered property.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub position: usize,
    values: BTreeMap<String, Value>,
}

impl Task {
    #[must_use]
    pub fn new(id: TaskId, position: usize, values: BTreeMap<String, Value>) -> Self {
        Self {
            id,
            position,
            values,
        }
    }

    #[must_use]
    pub fn value(&self, property: &str) -> Option<&Value> {
        self.values.get(property)
    }

    /// Stores a canonical value, returning the previous one. Bypasses
    /// parsing; command apply/revert goes through here.
    pub fn set_raw(&mut self, property: &str, value: Value) -> Option<Value> {
        self.values.insert(property.to_owned(), value)
    }
}
