//! Then steps for board reordering BDD scenarios.

use super::world::{BoardWorld, run_async, status, title_list};
use rstest_bdd_macros::then;
use taskboard::board::{
    domain::{Task, bucket_of},
    ports::TaskRepository,
};

fn column_titles(tasks: &[Task], column: &str) -> Result<Vec<String>, eyre::Report> {
    Ok(bucket_of(tasks, status(column)?)
        .into_iter()
        .map(|task| task.details().title().to_owned())
        .collect())
}

#[then(r#"the "{column}" column reads "{titles}""#)]
fn rendered_column_reads(
    world: &BoardWorld,
    column: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let rendered = world
        .service
        .tasks()
        .map_err(|err| eyre::eyre!("rendering failed: {err}"))?;
    let found = column_titles(&rendered, &column)?;
    let expected = title_list(&titles);
    if found != expected {
        return Err(eyre::eyre!(
            "expected {column} column {expected:?}, found {found:?}"
        ));
    }
    Ok(())
}

#[then(r#"the stored "{column}" column reads "{titles}""#)]
fn stored_column_reads(
    world: &BoardWorld,
    column: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let stored = run_async(world.repository.list_for_container(world.container_id))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    let found = column_titles(&stored, &column)?;
    let expected = title_list(&titles);
    if found != expected {
        return Err(eyre::eyre!(
            "expected stored {column} column {expected:?}, found {found:?}"
        ));
    }
    Ok(())
}

#[then("{count:usize} task writes are issued")]
fn writes_issued(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let writes = world
        .last_writes
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing write outcomes in scenario world"))?;
    if writes.len() != count {
        return Err(eyre::eyre!(
            "expected {count} writes, found {}",
            writes.len()
        ));
    }
    if let Some(failed) = writes.iter().find(|outcome| !outcome.is_ok()) {
        return Err(eyre::eyre!("write for {} failed", failed.task_id));
    }
    Ok(())
}

#[then(r#"task "{title}" is stored with status "{column}" at order {order:i64}"#)]
fn task_stored_at(
    world: &BoardWorld,
    title: String,
    column: String,
    order: i64,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let stored = run_async(world.repository.list_for_container(world.container_id))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    let task = stored
        .iter()
        .find(|task| task.id() == task_id)
        .ok_or_else(|| eyre::eyre!("task {title} missing from persistence"))?;

    if task.status() != status(&column)? || task.order().value() != order {
        return Err(eyre::eyre!(
            "expected {title} in {column} at {order}, found {} at {}",
            task.status(),
            task.order()
        ));
    }
    Ok(())
}
