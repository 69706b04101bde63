//! Optimistic overlay merged on top of authoritative task data.

use crate::board::domain::{OrderIndex, Task, TaskId, TaskStatus, TaskUpdate};
use std::collections::HashMap;

/// Identifies the batch of updates that wrote an overlay entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw generation counter.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Optimistic position of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayEntry {
    /// Status to display, when the task changed bucket optimistically.
    pub status: Option<TaskStatus>,
    /// Order to display.
    pub order: OrderIndex,
    /// Batch that wrote the entry.
    pub generation: Generation,
}

/// Map of optimistic positions keyed by task id.
///
/// Later batches overwrite earlier ones per task. Entries never add or
/// remove tasks from the rendered set: ids missing from the base data are
/// ignored when projecting.
#[derive(Debug, Clone, Default)]
pub struct OptimisticOverlay {
    entries: HashMap<TaskId, OverlayEntry>,
    last_generation: u64,
}

impl OptimisticOverlay {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a batch of updates and returns the generation stamped on its
    /// entries.
    ///
    /// An update without a status keeps the status of a pending entry for
    /// the same task, so a reorder following an unconfirmed cross-bucket
    /// move does not drop the move.
    pub fn apply(&mut self, updates: &[TaskUpdate]) -> Generation {
        self.last_generation = self.last_generation.saturating_add(1);
        let generation = Generation(self.last_generation);
        for update in updates {
            let pending_status = self
                .entries
                .get(&update.task_id)
                .and_then(|entry| entry.status);
            self.entries.insert(
                update.task_id,
                OverlayEntry {
                    status: update.status.or(pending_status),
                    order: update.order,
                    generation,
                },
            );
        }
        generation
    }

    /// Removes the entries written by `generation` and returns how many
    /// were removed.
    ///
    /// Entries a later batch overwrote are kept.
    pub fn expire(&mut self, generation: Generation) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.generation != generation);
        before.saturating_sub(self.entries.len())
    }

    /// Drops entries that fresh authoritative data already reflects, along
    /// with entries for tasks no longer present. Returns how many were
    /// removed.
    pub fn supersede(&mut self, base: &[Task]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|task_id, entry| {
            base.iter()
                .find(|task| task.id() == *task_id)
                .is_some_and(|task| !reflects(task, entry))
        });
        before.saturating_sub(self.entries.len())
    }

    /// Removes the entry for one task.
    pub fn forget(&mut self, task_id: TaskId) -> Option<OverlayEntry> {
        self.entries.remove(&task_id)
    }

    /// Returns base data with overlay entries applied.
    #[must_use]
    pub fn project(&self, base: &[Task]) -> Vec<Task> {
        base.iter()
            .cloned()
            .map(|mut task| {
                if let Some(entry) = self.entries.get(&task.id()) {
                    task.reposition(entry.status, Some(entry.order));
                }
                task
            })
            .collect()
    }

    /// Returns the entry for one task.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<&OverlayEntry> {
        self.entries.get(&task_id)
    }

    /// Returns the number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no optimistic state is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn reflects(task: &Task, entry: &OverlayEntry) -> bool {
    task.order() == entry.order && entry.status.is_none_or(|status| task.status() == status)
}
