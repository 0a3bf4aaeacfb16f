#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::core::registry::PropertyRegistry;
use crate::error::PlaneditError;
use crate::task::model::{Task, TaskId};

/// Flat task arena keyed by stable id. Creation order is kept so listings
/// are deterministic.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: BTreeMap<TaskId, Task>,
    order: Vec<TaskId>,
}

impl TaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a task with every registered property set to its default.
    pub fn create(&mut self, position: usize, registry: &PropertyRegistry) -> TaskId {
        let id = TaskId::new();
        let values = registry
            .iter()
            .map(|d| (d.name.to_owned(), d.default.clone()))
            .collect();
        self.tasks
            .insert(id.clone(), Task::new(id.clone(), position, values));
        self.order.push(id.clone());
        id
    }

    pub fn get(&self, id: &TaskId) -> Result<&Task, PlaneditError> {
        self.tasks
            .get(id)
            .ok_or_else(|| PlaneditError::UnknownTask(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Result<&mut Task, PlaneditError> {
        self.tasks
            .get_mut(id)
            .ok_or_else(|| PlaneditError::UnknownTask(id.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tasks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }
}
