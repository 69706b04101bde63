//! Drop resolver: turns a finished drag gesture into bucket mutations.

use super::{OrderIndex, Task, TaskId, TaskStatus, TaskUpdate, bucket_of, reindex};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a dragged task was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// A bucket itself (column header or empty column area).
    Bucket(TaskStatus),
    /// Another task card.
    Task(TaskId),
}

impl DropTarget {
    /// Interprets a raw drop-target identifier captured by a presentation
    /// adapter.
    ///
    /// Status storage strings (`"in_progress"`) name buckets, UUID strings
    /// name tasks. Anything else is not a valid target.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        TaskStatus::try_from(raw).map_or_else(
            |_| {
                Uuid::parse_str(raw.trim())
                    .ok()
                    .map(|uuid| Self::Task(TaskId::from_uuid(uuid)))
            },
            |status| Some(Self::Bucket(status)),
        )
    }

    /// Returns the raw identifier presentation adapters attach to this
    /// target.
    #[must_use]
    pub fn raw_id(&self) -> String {
        match self {
            Self::Bucket(status) => status.as_str().to_owned(),
            Self::Task(task_id) => task_id.to_string(),
        }
    }
}

/// A completed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    /// Task that was dragged.
    pub dragged: TaskId,
    /// Where it was released, if over a valid target.
    pub target: Option<DropTarget>,
}

impl DragEnd {
    /// Creates a drag gesture released over `target`.
    #[must_use]
    pub const fn new(dragged: TaskId, target: DropTarget) -> Self {
        Self {
            dragged,
            target: Some(target),
        }
    }

    /// Creates a drag gesture from a raw drop-target identifier.
    ///
    /// A missing or unparseable identifier yields a gesture with no target,
    /// which resolves to no updates.
    #[must_use]
    pub fn from_raw(dragged: TaskId, raw_target: Option<&str>) -> Self {
        Self {
            dragged,
            target: raw_target.and_then(DropTarget::parse),
        }
    }
}

/// Computes the updates a drop implies over `tasks`.
///
/// Same-bucket drops onto another task move the dragged task in front of
/// that task: it is removed from its old index and reinserted at the
/// target's post-removal index. Cross-bucket drops insert the task in front
/// of the target task, or append it on a bare bucket drop, and change its
/// status.
///
/// Dropping a task onto itself or onto the bucket it already sits in yields
/// no updates, as do drops with no target or unknown ids. Only entries whose
/// order or status change are returned.
#[must_use]
pub fn resolve_drop(tasks: &[Task], drag: &DragEnd) -> Vec<TaskUpdate> {
    let Some(target) = drag.target else {
        return Vec::new();
    };
    let Some(dragged) = find(tasks, drag.dragged) else {
        return Vec::new();
    };

    let (target_status, anchor) = match target {
        DropTarget::Bucket(status) => (status, None),
        DropTarget::Task(target_id) if target_id == dragged.id() => return Vec::new(),
        DropTarget::Task(target_id) => match find(tasks, target_id) {
            Some(target_task) => (target_task.status(), Some(target_id)),
            None => return Vec::new(),
        },
    };

    if target_status != dragged.status() {
        return move_across(tasks, dragged, target_status, anchor);
    }
    anchor.map_or_else(Vec::new, |anchor_id| reorder_within(tasks, dragged, anchor_id))
}

fn find(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|task| task.id() == id)
}

fn position_of(sequence: &[&Task], id: TaskId) -> Option<usize> {
    sequence.iter().position(|task| task.id() == id)
}

fn reorder_within(tasks: &[Task], dragged: &Task, anchor: TaskId) -> Vec<TaskUpdate> {
    let mut sequence = bucket_of(tasks, dragged.status());
    let Some(from) = position_of(&sequence, dragged.id()) else {
        return Vec::new();
    };
    sequence.remove(from);

    let Some(to) = position_of(&sequence, anchor) else {
        return Vec::new();
    };
    sequence.insert(to, dragged);

    reindex(sequence.iter().copied())
}

fn move_across(
    tasks: &[Task],
    dragged: &Task,
    target_status: TaskStatus,
    anchor: Option<TaskId>,
) -> Vec<TaskUpdate> {
    let mut sequence: Vec<&Task> = bucket_of(tasks, target_status)
        .into_iter()
        .filter(|task| task.id() != dragged.id())
        .collect();

    let to = anchor
        .and_then(|anchor_id| position_of(&sequence, anchor_id))
        .unwrap_or(sequence.len());
    sequence.insert(to, dragged);

    sequence
        .iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let order = OrderIndex::at_position(index);
            if task.id() == dragged.id() {
                Some(TaskUpdate::transition(task.id(), order, target_status))
            } else {
                (task.order() != order).then(|| TaskUpdate::reorder(task.id(), order))
            }
        })
        .collect()
}
