#![forbid(unsafe_code)]

use crate::config::Config;
use crate::core::codec::{self, CodecContext, CodecError};
use crate::core::registry::PropertyRegistry;
use crate::core::resource::{ResourceDirectory, ResourceId};
use crate::core::value::{Role, Value};
use crate::error::PlaneditError;
use crate::task::model::TaskId;
use crate::task::store::TaskStore;
use crate::undo::{CommandStack, Edit};

/// Notification hook for the host scheduling engine. Fired after every
/// applied and every reverted edit; the core never waits on the result.
pub trait ChangeObserver {
    fn property_changed(&mut self, task: &TaskId, property: &str, old: &Value, new: &Value);
}

/// Facade composing the property registry, task storage, resource
/// directory and undo stack. All operations are synchronous; callers
/// serialize access (single writer).
pub struct Project {
    config: Config,
    registry: PropertyRegistry,
    tasks: TaskStore,
    resources: ResourceDirectory,
    history: CommandStack,
    observer: Option<Box<dyn ChangeObserver>>,
}

impl Project {
    pub fn new(config: Config) -> Result<Self, PlaneditError> {
        config.validate()?;
        let registry = PropertyRegistry::standard(&config.defaults)?;
        let history = CommandStack::new(config.undo.history_limit);
        Ok(Self {
            config,
            registry,
            tasks: TaskStore::new(),
            resources: ResourceDirectory::new(),
            history,
            observer: None,
        })
    }

    /// Creates a task at the given outline position with every property
    /// set to its registered default.
    pub fn create_task(&mut self, position: usize) -> TaskId {
        self.tasks.create(position, &self.registry)
    }

    /// Registers a resource so `Allocation` values can resolve its name.
    pub fn add_resource(&mut self, name: &str) -> ResourceId {
        self.resources.add(name)
    }

    pub fn set_observer(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observer = Some(observer);
    }

    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    #[must_use]
    pub fn resources(&self) -> &ResourceDirectory {
        &self.resources
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads a property under the default (Edit) role.
    pub fn data(&self, task: &TaskId, property: &str) -> Result<Value, PlaneditError> {
        self.data_role(task, property, Role::Edit)
    }

    /// Reads a property under an explicit role. Display results are
    /// `Value::Text`.
    pub fn data_role(
        &self,
        task: &TaskId,
        property: &str,
        role: Role,
    ) -> Result<Value, PlaneditError> {
        let def = self.registry.resolve(property)?;
        let t = self.tasks.get(task)?;
        let value = t
            .value(def.name)
            .cloned()
            .unwrap_or_else(|| def.default.clone());
        let ctx = CodecContext {
            currency: &self.config.currency,
            resources: &self.resources,
        };
        Ok(codec::format(&value, role, ctx))
    }

    /// Human-readable rendering of a property, for listings.
    pub fn display(&self, task: &TaskId, property: &str) -> Result<String, PlaneditError> {
        let v = self.data_role(task, property, Role::Display)?;
        Ok(v.as_text().unwrap_or_default().to_owned())
    }

    /// Plain-text rendering of a value read from this project: bare
    /// integers and amounts, no locale dressing.
    #[must_use]
    pub fn value_text(&self, value: &Value) -> String {
        let ctx = CodecContext {
            currency: &self.config.currency,
            resources: &self.resources,
        };
        codec::edit_text(value, ctx)
    }

    /// Parses and applies a property edit, recording it in the open
    /// command. Returns `false` on any failure; the task is untouched
    /// then. Edits are visible to readers immediately, before the open
    /// command is committed.
    pub fn set_data(&mut self, task: &TaskId, property: &str, input: &str) -> bool {
        self.try_set_data(task, property, input).is_ok()
    }

    /// Like `set_data` but surfaces the failure cause.
    pub fn try_set_data(
        &mut self,
        task: &TaskId,
        property: &str,
        input: &str,
    ) -> Result<(), PlaneditError> {
        let def = self.registry.resolve(property)?;
        let name = def.name;
        let default = def.default.clone();
        let ctx = CodecContext {
            currency: &self.config.currency,
            resources: &self.resources,
        };
        let new = codec::parse(def.kind, input, ctx).map_err(|e| match e {
            CodecError::Parse(msg) => PlaneditError::Parse {
                property: property.to_owned(),
                msg,
            },
            CodecError::UnknownResource(r) => PlaneditError::UnknownResource(r),
        })?;

        let t = self.tasks.get_mut(task)?;
        let old = t.set_raw(name, new.clone()).unwrap_or(default);

        self.history.record(Edit {
            task: task.clone(),
            property: name.to_owned(),
            old: old.clone(),
            new: new.clone(),
        });
        self.notify(task, name, &old, &new);
        Ok(())
    }

    /// Closes the open command under `name` (empty is legal) and pushes
    /// it onto the undo history. No-op without pending edits.
    pub fn add_command(&mut self, name: &str) {
        self.history.commit(name);
    }

    /// Undoes the most recent unit: pending edits if any, otherwise the
    /// newest committed command. Reverse-applies its edits and discards
    /// it. Silent no-op when there is nothing to revert.
    pub fn revert_command(&mut self) {
        let Some(cmd) = self.history.take_revert_unit() else {
            return;
        };
        for edit in cmd.edits().iter().rev() {
            if let Ok(t) = self.tasks.get_mut(&edit.task) {
                t.set_raw(&edit.property, edit.old.clone());
            }
            self.notify(&edit.task, &edit.property, &edit.new, &edit.old);
        }
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.committed_len()
    }

    #[must_use]
    pub fn has_pending_edits(&self) -> bool {
        self.history.has_pending_edits()
    }

    fn notify(&mut self, task: &TaskId, property: &str, old: &Value, new: &Value) {
        if let Some(obs) = self.observer.as_mut() {
            obs.property_changed(task, property, old, new);
        }
    }
}
