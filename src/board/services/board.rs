//! Board service: hosts one board or list view and reconciles drag-and-drop
//! moves with the persistence service.

use super::{
    config::ReconcileConfig,
    overlay::{Generation, OptimisticOverlay},
    writes::{PendingWrites, WriteOutcome},
};
use crate::board::{
    domain::{
        BoardView, ContainerId, DragEnd, DropTarget, GroupedList, Task, TaskDetails,
        TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskUpdate, append_order, bucket_of,
        resolve_drop,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, instrument, warn};

/// Explicit scope of the board a service instance renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardContext {
    container_id: ContainerId,
}

impl BoardContext {
    /// Creates a context for one container.
    #[must_use]
    pub const fn new(container_id: ContainerId) -> Self {
        Self { container_id }
    }

    /// Returns the container the board renders.
    #[must_use]
    pub const fn container_id(&self) -> ContainerId {
        self.container_id
    }
}

/// Request payload for creating a task on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    status: TaskStatus,
    priority: TaskPriority,
    assignees: Vec<String>,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request for a task in the backlog.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: TaskStatus::Backlog,
            priority: TaskPriority::default(),
            assignees: Vec::new(),
            due_date: None,
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// A thread panicked while holding the board state.
    #[error("board state lock poisoned: {0}")]
    StatePoisoned(String),
    /// Background work was requested outside a Tokio runtime.
    #[error("no Tokio runtime available for background work")]
    NoRuntime,
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

#[derive(Debug, Default)]
struct BoardState {
    base: Vec<Task>,
    overlay: OptimisticOverlay,
}

impl BoardState {
    fn view(&self) -> Vec<Task> {
        self.overlay.project(&self.base)
    }

    fn replace_base(&mut self, tasks: Vec<Task>) -> usize {
        self.base = tasks;
        self.overlay.supersede(&self.base)
    }
}

/// Board orchestration service.
///
/// Holds the authoritative task list of one container plus the optimistic
/// overlay. Drops resolve against the merged view, so a second drag issued
/// before the first one's writes land sees the first move's result.
pub struct BoardService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
    context: BoardContext,
    config: ReconcileConfig,
    state: Arc<Mutex<BoardState>>,
}

impl<R, C> Clone for BoardService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            context: self.context,
            config: self.config,
            state: Arc::clone(&self.state),
        }
    }
}

impl<R, C> BoardService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a board service with an empty task list. Call
    /// [`Self::refresh`] or [`Self::follow`] to load data.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        context: BoardContext,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            context,
            config,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    /// Returns the board scope.
    #[must_use]
    pub const fn context(&self) -> BoardContext {
        self.context
    }

    /// Returns the reconciliation settings.
    #[must_use]
    pub const fn config(&self) -> ReconcileConfig {
        self.config
    }

    fn lock(&self) -> BoardServiceResult<MutexGuard<'_, BoardState>> {
        self.state
            .lock()
            .map_err(|err| BoardServiceError::StatePoisoned(err.to_string()))
    }

    fn runtime() -> BoardServiceResult<Handle> {
        Handle::try_current().map_err(|_| BoardServiceError::NoRuntime)
    }

    /// Reloads authoritative data from the persistence service.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the list call fails.
    #[instrument(skip(self), fields(container_id = %self.context.container_id))]
    pub async fn refresh(&self) -> BoardServiceResult<()> {
        let tasks = self
            .repository
            .list_for_container(self.context.container_id)
            .await?;
        self.replace_base(tasks)
    }

    /// Replaces authoritative data, for example from a subscription push.
    ///
    /// Overlay entries the new data already reflects are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn replace_base(&self, tasks: Vec<Task>) -> BoardServiceResult<()> {
        let superseded = self.lock()?.replace_base(tasks);
        if superseded > 0 {
            debug!(superseded, "authoritative data superseded optimistic entries");
        }
        Ok(())
    }

    /// Subscribes to the container and keeps authoritative data current in
    /// the background.
    ///
    /// The returned task ends when the persistence service closes the
    /// subscription.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the subscription cannot
    /// be established, or [`BoardServiceError::NoRuntime`] when awaited
    /// outside a Tokio runtime.
    #[instrument(skip(self), fields(container_id = %self.context.container_id))]
    pub async fn follow(&self) -> BoardServiceResult<JoinHandle<()>> {
        let runtime = Self::runtime()?;
        let mut subscription = self.repository.subscribe(self.context.container_id).await?;
        let initial = subscription.borrow_and_update().clone();
        self.replace_base(initial)?;

        let service = self.clone();
        Ok(runtime.spawn(async move {
            while subscription.changed().await.is_ok() {
                let tasks = subscription.borrow_and_update().clone();
                if let Err(err) = service.replace_base(tasks) {
                    warn!(error = %err, "dropping subscription update");
                    break;
                }
            }
        }))
    }

    /// Returns the rendered task list: authoritative data with optimistic
    /// entries applied.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn tasks(&self) -> BoardServiceResult<Vec<Task>> {
        Ok(self.lock()?.view())
    }

    /// Returns one bucket of the rendered list in display order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn bucket(&self, status: TaskStatus) -> BoardServiceResult<Vec<Task>> {
        let view = self.tasks()?;
        Ok(bucket_of(&view, status).into_iter().cloned().collect())
    }

    /// Returns the rendered list grouped into board columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn board(&self) -> BoardServiceResult<BoardView> {
        Ok(BoardView::from_tasks(&self.tasks()?))
    }

    /// Returns the rendered list grouped into list sections.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn grouped_list(&self, include_empty: bool) -> BoardServiceResult<GroupedList> {
        Ok(GroupedList::from_tasks(&self.tasks()?, include_empty))
    }

    /// Handles a finished drag gesture.
    ///
    /// Resolves the drop against the rendered list, applies the result
    /// optimistically, issues one write per changed task, and schedules the
    /// overlay to expire after the configured TTL. Invalid drops change
    /// nothing and issue no writes.
    ///
    /// Writes and expiry run on the Tokio runtime of the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned, and [`BoardServiceError::NoRuntime`] when a drop that
    /// changes the board is handled outside a Tokio runtime; the view is
    /// left untouched in that case. Write failures are not errors here; they
    /// surface through [`PendingWrites::settle`] and the next authoritative
    /// refresh.
    #[instrument(skip(self), fields(container_id = %self.context.container_id))]
    pub fn handle_drop(&self, drag: DragEnd) -> BoardServiceResult<PendingWrites> {
        let (runtime, updates, generation) = {
            let mut state = self.lock()?;
            let updates = resolve_drop(&state.view(), &drag);
            if updates.is_empty() {
                debug!(dragged = %drag.dragged, "drop resolved to no change");
                return Ok(PendingWrites::default());
            }
            let runtime = Self::runtime()?;
            let generation = state.overlay.apply(&updates);
            (runtime, updates, generation)
        };
        debug!(
            dragged = %drag.dragged,
            updates = updates.len(),
            generation = generation.value(),
            "drop applied optimistically"
        );

        let writes = self.spawn_writes(&runtime, &updates);
        let expiry = self.spawn_expiry(&runtime, generation);
        Ok(PendingWrites::new(updates, writes, Some(expiry)))
    }

    /// Moves a task to the end of another bucket, as an explicit alternative
    /// to dragging it onto the column. Naming the bucket the task already
    /// sits in changes nothing.
    ///
    /// # Errors
    ///
    /// Same as [`Self::handle_drop`].
    pub fn move_to_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> BoardServiceResult<PendingWrites> {
        self.handle_drop(DragEnd::new(task_id, DropTarget::Bucket(status)))
    }

    /// Merges updates into the overlay without issuing writes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn apply_optimistic(&self, updates: &[TaskUpdate]) -> BoardServiceResult<Generation> {
        Ok(self.lock()?.overlay.apply(updates))
    }

    /// Issues one independent write per update.
    ///
    /// Writes may complete in any order or fail independently; failures are
    /// logged and never retried.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NoRuntime`] when called outside a Tokio
    /// runtime.
    pub fn commit(
        &self,
        updates: &[TaskUpdate],
    ) -> BoardServiceResult<Vec<JoinHandle<WriteOutcome>>> {
        Ok(self.spawn_writes(&Self::runtime()?, updates))
    }

    fn spawn_writes(
        &self,
        runtime: &Handle,
        updates: &[TaskUpdate],
    ) -> Vec<JoinHandle<WriteOutcome>> {
        updates
            .iter()
            .map(|update| {
                let repository = Arc::clone(&self.repository);
                let task_id = update.task_id;
                let patch = update.to_patch();
                runtime.spawn(async move {
                    let result = repository.update_task(task_id, patch).await;
                    if let Err(err) = &result {
                        warn!(%task_id, error = %err, "task write failed");
                    }
                    WriteOutcome { task_id, result }
                })
            })
            .collect()
    }

    /// Removes a batch's overlay entries now.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn expire(&self, generation: Generation) -> BoardServiceResult<usize> {
        Ok(self.lock()?.overlay.expire(generation))
    }

    /// Removes a batch's overlay entries once the TTL elapses, whatever
    /// happened to its writes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NoRuntime`] when called outside a Tokio
    /// runtime.
    pub fn schedule_expiry(&self, generation: Generation) -> BoardServiceResult<JoinHandle<()>> {
        Ok(self.spawn_expiry(&Self::runtime()?, generation))
    }

    fn spawn_expiry(&self, runtime: &Handle, generation: Generation) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let ttl = self.config.overlay_ttl;
        runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            match state.lock() {
                Ok(mut guard) => {
                    let expired = guard.overlay.expire(generation);
                    debug!(
                        generation = generation.value(),
                        expired, "optimistic entries expired"
                    );
                }
                Err(err) => warn!(error = %err, "board state poisoned; overlay not expired"),
            }
        })
    }

    /// Returns `true` while any optimistic entry is pending.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn has_pending(&self) -> BoardServiceResult<bool> {
        Ok(!self.lock()?.overlay.is_empty())
    }

    /// Creates a task at the end of its bucket.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] when input validation fails or the
    /// repository rejects persistence.
    #[instrument(skip(self, request), fields(container_id = %self.context.container_id))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardServiceResult<Task> {
        let mut details = TaskDetails::new(request.title)?
            .with_priority(request.priority)
            .with_assignees(request.assignees)?;
        if let Some(due_date) = request.due_date {
            details = details.with_due_date(due_date);
        }

        let order = {
            let view = self.tasks()?;
            append_order(bucket_of(&view, request.status))
        };
        let task = Task::new(
            self.context.container_id,
            request.status,
            order,
            details,
            &*self.clock,
        );
        self.repository.create(&task).await?;

        let mut state = self.lock()?;
        if !state.base.iter().any(|existing| existing.id() == task.id()) {
            state.base.push(task.clone());
        }
        Ok(task)
    }

    /// Deletes a task and discards any optimistic state for it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the repository rejects
    /// the deletion.
    #[instrument(skip(self), fields(container_id = %self.context.container_id))]
    pub async fn delete_task(&self, task_id: TaskId) -> BoardServiceResult<()> {
        self.repository.delete(task_id).await?;
        let mut state = self.lock()?;
        state.base.retain(|task| task.id() != task_id);
        state.overlay.forget(task_id);
        Ok(())
    }
}
