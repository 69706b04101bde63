//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ContainerId, OrderIndex, Task, TaskDetails, TaskId, TaskStatus, bucket_of},
    ports::TaskRepository,
    services::{BoardContext, BoardService, ReconcileConfig},
};

/// Board service over the in-memory repository.
pub type MemoryBoard = BoardService<InMemoryTaskRepository, DefaultClock>;

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> Arc<InMemoryTaskRepository> {
    Arc::new(InMemoryTaskRepository::new())
}

/// Provides a container ID for tests.
#[fixture]
pub fn container_id() -> ContainerId {
    ContainerId::new()
}

/// Creates a board service for `container_id` over `repo`.
pub fn board(repo: &Arc<InMemoryTaskRepository>, container_id: ContainerId) -> MemoryBoard {
    BoardService::new(
        Arc::clone(repo),
        Arc::new(DefaultClock),
        BoardContext::new(container_id),
        ReconcileConfig::default(),
    )
}

/// Stores one task per title in `status`, spaced one step apart, and
/// returns them.
///
/// # Errors
///
/// Returns an error if a title is invalid or the repository rejects a task.
pub async fn seed_bucket(
    repo: &InMemoryTaskRepository,
    container_id: ContainerId,
    status: TaskStatus,
    titles: &[&str],
) -> Result<Vec<Task>, eyre::Report> {
    let mut tasks = Vec::with_capacity(titles.len());
    for (index, title) in titles.iter().enumerate() {
        let task = Task::new(
            container_id,
            status,
            OrderIndex::at_position(index),
            TaskDetails::new(*title)?,
            &DefaultClock,
        );
        repo.create(&task).await?;
        tasks.push(task);
    }
    Ok(tasks)
}

/// Returns the titles of one bucket in display order.
#[must_use]
pub fn titles(tasks: &[Task], status: TaskStatus) -> Vec<String> {
    bucket_of(tasks, status)
        .into_iter()
        .map(|task| task.details().title().to_owned())
        .collect()
}

/// Finds a task ID by title.
///
/// # Errors
///
/// Returns an error if no task has the title.
pub fn id_of(tasks: &[Task], title: &str) -> Result<TaskId, eyre::Report> {
    tasks
        .iter()
        .find(|task| task.details().title() == title)
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("no task titled {title}"))
}
