//! In-memory persistence service for board tasks.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::board::{
    domain::{ContainerId, Task, TaskId, TaskPatch},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSubscription},
};

/// Thread-safe in-memory task repository with change subscriptions.
///
/// Tasks are listed in creation order within each container.
pub struct InMemoryTaskRepository<C = DefaultClock> {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    container_index: HashMap<ContainerId, Vec<TaskId>>,
    subscribers: HashMap<ContainerId, watch::Sender<Vec<Task>>>,
}

impl<C> Clone for InMemoryTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskRepository")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty in-memory repository stamping updates with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }
}

fn poisoned(err: impl fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects a container's tasks in creation order.
fn snapshot(state: &InMemoryTaskState, container_id: ContainerId) -> Vec<Task> {
    state
        .container_index
        .get(&container_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.tasks.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Pushes the container's current list to its subscribers, if any.
///
/// Senders whose receivers have all been dropped are discarded.
fn publish(state: &mut InMemoryTaskState, container_id: ContainerId) {
    let Some(sender) = state.subscribers.get(&container_id) else {
        return;
    };
    if sender.receiver_count() == 0 {
        state.subscribers.remove(&container_id);
        return;
    }
    sender.send_replace(snapshot(state, container_id));
}

#[async_trait]
impl<C> TaskRepository for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn list_for_container(
        &self,
        container_id: ContainerId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(snapshot(&state, container_id))
    }

    async fn subscribe(&self, container_id: ContainerId) -> TaskRepositoryResult<TaskSubscription> {
        let mut state = self.state.write().map_err(poisoned)?;
        if let Some(sender) = state.subscribers.get(&container_id) {
            return Ok(sender.subscribe());
        }
        let (sender, receiver) = watch::channel(snapshot(&state, container_id));
        state.subscribers.insert(container_id, sender);
        Ok(receiver)
    }

    async fn create(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state
            .container_index
            .entry(task.container_id())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        publish(&mut state, task.container_id());
        Ok(())
    }

    async fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let task = state
            .tasks
            .get_mut(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        task.apply_patch(&patch, &*self.clock);
        let container_id = task.container_id();
        publish(&mut state, container_id);
        Ok(())
    }

    async fn delete(&self, task_id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state
            .tasks
            .remove(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;

        let container_id = removed.container_id();
        if let Some(ids) = state.container_index.get_mut(&container_id) {
            ids.retain(|id| *id != task_id);
            if ids.is_empty() {
                state.container_index.remove(&container_id);
            }
        }
        publish(&mut state, container_id);
        Ok(())
    }
}
