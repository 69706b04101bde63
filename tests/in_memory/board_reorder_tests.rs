//! In-memory integration tests for drag-and-drop through the board service.

use std::sync::Arc;

use super::helpers::{board, container_id, id_of, repo, seed_bucket, titles};
use rstest::rstest;
use taskboard::board::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ContainerId, DragEnd, DropTarget, ListRow, OrderIndex, TaskStatus},
    ports::TaskRepository,
    services::CreateTaskRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_is_persisted_with_minimal_writes(
    repo: Arc<InMemoryTaskRepository>,
    container_id: ContainerId,
) -> Result<(), eyre::Report> {
    let seeded =
        seed_bucket(&repo, container_id, TaskStatus::Backlog, &["A", "B", "C"]).await?;
    let service = board(&repo, container_id);
    service.refresh().await?;

    let drag = DragEnd::new(
        id_of(&seeded, "C")?,
        DropTarget::Task(id_of(&seeded, "B")?),
    );
    let mut pending = service.handle_drop(drag)?;
    let outcomes = pending.settle().await;

    eyre::ensure!(outcomes.len() == 2, "expected two writes, got {}", outcomes.len());
    eyre::ensure!(
        outcomes.iter().all(|outcome| outcome.is_ok()),
        "expected every write to succeed"
    );
    let stored = repo.list_for_container(container_id).await?;
    eyre::ensure!(
        titles(&stored, TaskStatus::Backlog) == ["A", "C", "B"],
        "stored order does not match the drop"
    );
    let a = stored
        .iter()
        .find(|task| task.details().title() == "A")
        .ok_or_else(|| eyre::eyre!("task A missing"))?;
    eyre::ensure!(a.order() == OrderIndex::FIRST, "untouched task was rewritten");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_bucket_drop_shifts_following_tasks(
    repo: Arc<InMemoryTaskRepository>,
    container_id: ContainerId,
) -> Result<(), eyre::Report> {
    let backlog = seed_bucket(&repo, container_id, TaskStatus::Backlog, &["F"]).await?;
    let done = seed_bucket(&repo, container_id, TaskStatus::Done, &["X", "G", "Y"]).await?;
    let service = board(&repo, container_id);
    service.refresh().await?;

    let drag = DragEnd::new(id_of(&backlog, "F")?, DropTarget::Task(id_of(&done, "G")?));
    service.handle_drop(drag)?.settle().await;

    let stored = repo.list_for_container(container_id).await?;
    let orders: Vec<(String, i64)> = stored
        .iter()
        .filter(|task| task.status() == TaskStatus::Done)
        .map(|task| (task.details().title().to_owned(), task.order().value()))
        .collect();
    eyre::ensure!(
        titles(&stored, TaskStatus::Done) == ["X", "F", "G", "Y"],
        "unexpected done bucket: {orders:?}"
    );
    eyre::ensure!(
        orders.contains(&("G".to_owned(), 2000)) && orders.contains(&("Y".to_owned(), 3000)),
        "following tasks did not shift by one step: {orders:?}"
    );
    eyre::ensure!(
        titles(&stored, TaskStatus::Backlog).is_empty(),
        "moved task still in backlog"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn followed_board_converges_on_persisted_state(
    repo: Arc<InMemoryTaskRepository>,
    container_id: ContainerId,
) -> Result<(), eyre::Report> {
    let seeded =
        seed_bucket(&repo, container_id, TaskStatus::Todo, &["one", "two", "three"]).await?;
    let service = board(&repo, container_id);
    let _follower = service.follow().await?;

    let drag = DragEnd::new(
        id_of(&seeded, "three")?,
        DropTarget::Bucket(TaskStatus::InProgress),
    );
    let mut pending = service.handle_drop(drag)?;
    pending.settle().await;
    pending.expired().await;

    let rendered = service.tasks()?;
    let stored = repo.list_for_container(container_id).await?;
    eyre::ensure!(
        titles(&rendered, TaskStatus::InProgress) == ["three"],
        "rendered board lost the move"
    );
    eyre::ensure!(
        titles(&rendered, TaskStatus::Todo) == titles(&stored, TaskStatus::Todo),
        "rendered board diverges from persisted state"
    );
    eyre::ensure!(!service.has_pending()?, "overlay outlived its TTL");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn grouped_list_exposes_headers_as_drop_targets(
    repo: Arc<InMemoryTaskRepository>,
    container_id: ContainerId,
) -> Result<(), eyre::Report> {
    let service = board(&repo, container_id);
    service
        .create_task(CreateTaskRequest::new("Draft roadmap").with_status(TaskStatus::Todo))
        .await?;
    let created = service
        .create_task(CreateTaskRequest::new("Review roadmap").with_status(TaskStatus::Todo))
        .await?;

    let list = service.grouped_list(true)?;
    let review_header = list
        .rows()
        .iter()
        .find(|row| matches!(row, ListRow::Header { status: TaskStatus::InReview, .. }))
        .ok_or_else(|| eyre::eyre!("in review header missing"))?;

    let drag = DragEnd::from_raw(created.id(), Some(&review_header.drop_target().raw_id()));
    service.handle_drop(drag)?.settle().await;

    let view = service.board()?;
    let moved = view
        .column(TaskStatus::InReview)
        .and_then(|column| column.tasks().first())
        .ok_or_else(|| eyre::eyre!("moved task missing from in review column"))?;
    eyre::ensure!(moved.id() == created.id(), "wrong task moved");
    eyre::ensure!(created.order() == OrderIndex::new(1000), "append order not applied");
    Ok(())
}
