//! Presentation grouping: board columns and the flat grouped list.
//!
//! Both views group tasks by status and sort each bucket ascending by order.
//! Ties keep the order in which tasks appear in the source list.

use super::{DropTarget, Task, TaskStatus};

/// Returns the tasks of one bucket sorted ascending by order.
#[must_use]
pub fn bucket_of(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    let mut bucket: Vec<&Task> = tasks.iter().filter(|task| task.status() == status).collect();
    bucket.sort_by_key(|task| task.order());
    bucket
}

/// One Kanban column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    status: TaskStatus,
    tasks: Vec<Task>,
}

impl BoardColumn {
    /// Returns the bucket status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the drop target for the column itself.
    #[must_use]
    pub const fn drop_target(&self) -> DropTarget {
        DropTarget::Bucket(self.status)
    }
}

/// Kanban board: one column per status, empty columns included so they can
/// receive drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    columns: Vec<BoardColumn>,
}

impl BoardView {
    /// Groups tasks into columns.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let columns = TaskStatus::ALL
            .into_iter()
            .map(|status| BoardColumn {
                status,
                tasks: bucket_of(tasks, status).into_iter().cloned().collect(),
            })
            .collect();
        Self { columns }
    }

    /// Returns the columns in board order.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    /// Returns the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.status == status)
    }
}

/// One row of the grouped list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    /// Section header for a bucket.
    Header {
        /// Bucket status.
        status: TaskStatus,
        /// Number of tasks in the section.
        count: usize,
    },
    /// A task inside the preceding section.
    Task(Task),
}

impl ListRow {
    /// Returns the drop target the row exposes.
    #[must_use]
    pub fn drop_target(&self) -> DropTarget {
        match self {
            Self::Header { status, .. } => DropTarget::Bucket(*status),
            Self::Task(task) => DropTarget::Task(task.id()),
        }
    }
}

/// Flat list grouped into status sections, each introduced by a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedList {
    rows: Vec<ListRow>,
}

impl GroupedList {
    /// Groups tasks into sections. Empty sections are kept when
    /// `include_empty` is set.
    #[must_use]
    pub fn from_tasks(tasks: &[Task], include_empty: bool) -> Self {
        let mut rows = Vec::new();
        for status in TaskStatus::ALL {
            let bucket = bucket_of(tasks, status);
            if bucket.is_empty() && !include_empty {
                continue;
            }
            rows.push(ListRow::Header {
                status,
                count: bucket.len(),
            });
            rows.extend(bucket.into_iter().cloned().map(ListRow::Task));
        }
        Self { rows }
    }

    /// Returns the rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }
}
