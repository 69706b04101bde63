//! Repository port for the persistence service that stores board tasks.

use crate::board::domain::{ContainerId, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Push channel carrying the full task list of one container after every
/// change.
pub type TaskSubscription = watch::Receiver<Vec<Task>>;

/// Task persistence contract.
///
/// Implementations are the system of record. Updates carry absolute values,
/// so concurrent calls for different task ids commute; concurrent calls for
/// the same id resolve as last write wins.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns the current tasks of a container, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the store cannot be
    /// read.
    async fn list_for_container(&self, container_id: ContainerId)
    -> TaskRepositoryResult<Vec<Task>>;

    /// Subscribes to a container's task list.
    ///
    /// The receiver holds the current list immediately and is updated after
    /// every create, update, or delete touching the container.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the subscription
    /// cannot be established.
    async fn subscribe(&self, container_id: ContainerId) -> TaskRepositoryResult<TaskSubscription>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn create(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Applies an absolute partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> TaskRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, task_id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
