//! Task aggregate and its descriptive details.

use super::{ContainerId, OrderIndex, TaskDomainError, TaskId, TaskPatch, TaskPriority, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive task fields. None of these take part in reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    title: String,
    priority: TaskPriority,
    assignees: Vec<String>,
    due_date: Option<NaiveDate>,
}

impl TaskDetails {
    /// Creates details with a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            priority: TaskPriority::default(),
            assignees: Vec::new(),
            due_date: None,
        })
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignees.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyAssignee`] when any name is blank.
    pub fn with_assignees(
        mut self,
        assignees: impl IntoIterator<Item = String>,
    ) -> Result<Self, TaskDomainError> {
        let names = assignees
            .into_iter()
            .map(|name| {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    Err(TaskDomainError::EmptyAssignee)
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.assignees = names;
        Ok(self)
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assignees.
    #[must_use]
    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

/// A task on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    container_id: ContainerId,
    status: TaskStatus,
    order: OrderIndex,
    details: TaskDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted container scope.
    pub container_id: ContainerId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted order within the status bucket.
    pub order: OrderIndex,
    /// Persisted descriptive fields.
    pub details: TaskDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task at the given bucket position.
    #[must_use]
    pub fn new(
        container_id: ContainerId,
        status: TaskStatus,
        order: OrderIndex,
        details: TaskDetails,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            container_id,
            status,
            order,
            details,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            container_id: data.container_id,
            status: data.status,
            order: data.order,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the container scope.
    #[must_use]
    pub const fn container_id(&self) -> ContainerId {
        self.container_id
    }

    /// Returns the status, which selects the task's bucket.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the order within the bucket.
    #[must_use]
    pub const fn order(&self) -> OrderIndex {
        self.order
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies an absolute partial update and refreshes `updated_at`.
    ///
    /// An empty patch leaves the task untouched.
    pub fn apply_patch(&mut self, patch: &TaskPatch, clock: &impl Clock) {
        if patch.is_empty() {
            return;
        }
        self.reposition(patch.status, patch.order);
        self.updated_at = clock.utc();
    }

    /// Overwrites status and order without touching timestamps. Used when
    /// projecting optimistic state onto authoritative data.
    pub(crate) fn reposition(&mut self, status: Option<TaskStatus>, order: Option<OrderIndex>) {
        if let Some(new_status) = status {
            self.status = new_status;
        }
        if let Some(new_order) = order {
            self.order = new_order;
        }
    }
}
