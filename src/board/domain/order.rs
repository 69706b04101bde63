//! Order index model: how positions inside a bucket are encoded and
//! recomputed after a move.
//!
//! Positions are integers spaced by [`ORDER_STEP`] rather than consecutive
//! integers. Every move rewrites the affected bucket as
//! `order = index * ORDER_STEP`; the spacing leaves headroom for single-task
//! insertions by strategies that only write one task.

use super::{Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance between two adjacent positions in a freshly indexed bucket.
pub const ORDER_STEP: i64 = 1000;

/// Sort position of a task within its status bucket.
///
/// Not unique and not guaranteed contiguous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderIndex(i64);

impl OrderIndex {
    /// Position of the first task in a bucket.
    pub const FIRST: Self = Self(0);

    /// Wraps a raw stored order value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the order assigned to the task at `index` of a reindexed
    /// bucket. Saturates instead of overflowing.
    #[must_use]
    pub fn at_position(index: usize) -> Self {
        let position = i64::try_from(index).unwrap_or(i64::MAX);
        Self(position.saturating_mul(ORDER_STEP))
    }

    /// Returns the position one step after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(ORDER_STEP))
    }

    /// Returns the raw order value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A computed position change for one task.
///
/// `status` is present only for the task that changed buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// Task being repositioned.
    pub task_id: TaskId,
    /// New absolute order within the task's bucket.
    pub order: OrderIndex,
    /// New status, when the task moved to another bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// Creates a same-bucket reposition.
    #[must_use]
    pub const fn reorder(task_id: TaskId, order: OrderIndex) -> Self {
        Self {
            task_id,
            order,
            status: None,
        }
    }

    /// Creates a cross-bucket move.
    #[must_use]
    pub const fn transition(task_id: TaskId, order: OrderIndex, status: TaskStatus) -> Self {
        Self {
            task_id,
            order,
            status: Some(status),
        }
    }

    /// Converts the update into the absolute partial update sent to the
    /// persistence service.
    #[must_use]
    pub const fn to_patch(&self) -> TaskPatch {
        TaskPatch {
            status: self.status,
            order: Some(self.order),
        }
    }
}

/// Partial task update accepted by the persistence service.
///
/// Present fields are absolute replacements, never relative adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Replacement order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderIndex>,
}

impl TaskPatch {
    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.order.is_none()
    }
}

/// Recomputes orders for a bucket already arranged in its intended visual
/// sequence.
///
/// Returns updates only for tasks whose stored order differs from
/// `index * ORDER_STEP`. Running this over an already indexed bucket yields
/// no updates.
pub fn reindex<'a>(bucket: impl IntoIterator<Item = &'a Task>) -> Vec<TaskUpdate> {
    bucket
        .into_iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let order = OrderIndex::at_position(index);
            (task.order() != order).then(|| TaskUpdate::reorder(task.id(), order))
        })
        .collect()
}

/// Returns the order for a task appended to the end of `bucket`.
///
/// The result sorts after every existing entry: one step past the current
/// maximum, or [`OrderIndex::FIRST`] for an empty bucket.
pub fn append_order<'a>(bucket: impl IntoIterator<Item = &'a Task>) -> OrderIndex {
    bucket
        .into_iter()
        .map(Task::order)
        .max()
        .map_or(OrderIndex::FIRST, OrderIndex::next)
}
