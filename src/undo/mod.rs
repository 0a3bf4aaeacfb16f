#![forbid(unsafe_code)]

use std::collections::VecDeque;

use crate::core::value::Value;
use crate::task::model::TaskId;

/// One reversible property change. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub task: TaskId,
    pub property: String,
    pub old: Value,
    pub new: Value,
}

/// A named group of edits. While open it accepts further edits; once
/// committed it is immutable and becomes the unit of undo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    name: String,
    edits: Vec<Edit>,
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Undo bookkeeping: the committed history plus at most one open command.
///
/// Commit boundaries exist only where the caller places them: every edit
/// lands in the open command until `commit` seals it. `take_revert_unit`
/// hands back the most recent unit (pending edits first, then the newest
/// committed command) for the caller to reverse-apply.
#[derive(Debug, Clone)]
pub struct CommandStack {
    committed: VecDeque<Command>,
    open: Command,
    limit: usize,
}

impl CommandStack {
    /// `limit` bounds the committed history; committing beyond it drops
    /// the oldest entry.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            committed: VecDeque::new(),
            open: Command::default(),
            limit: limit.max(1),
        }
    }

    /// Appends an edit to the open command.
    pub fn record(&mut self, edit: Edit) {
        self.open.edits.push(edit);
    }

    /// Seals the open command under `name` and pushes it onto the
    /// committed history. An empty name is a legal, anonymous unit.
    /// Without pending edits this is a no-op: no empty command is kept.
    pub fn commit(&mut self, name: &str) {
        if self.open.is_empty() {
            return;
        }
        let mut cmd = std::mem::take(&mut self.open);
        cmd.name = name.to_owned();
        self.committed.push_back(cmd);
        while self.committed.len() > self.limit {
            self.committed.pop_front();
        }
    }

    /// Removes and returns the most recent unit: the open command if it
    /// has pending edits, otherwise the newest committed command. `None`
    /// when there is nothing to revert.
    pub fn take_revert_unit(&mut self) -> Option<Command> {
        if !self.open.is_empty() {
            return Some(std::mem::take(&mut self.open));
        }
        self.committed.pop_back()
    }

    #[must_use]
    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    #[must_use]
    pub fn has_pending_edits(&self) -> bool {
        !self.open.is_empty()
    }

    /// Committed commands, oldest first.
    pub fn iter_committed(&self) -> impl Iterator<Item = &Command> {
        self.committed.iter()
    }
}
