//! When steps for board reordering BDD scenarios.

use super::world::{BoardWorld, run_async, status};
use rstest_bdd_macros::when;
use taskboard::board::domain::{DragEnd, DropTarget};

fn drop_and_settle(world: &mut BoardWorld, drag: DragEnd) -> Result<(), eyre::Report> {
    let mut pending = world
        .service
        .handle_drop(drag)
        .map_err(|err| eyre::eyre!("drop failed: {err}"))?;
    world.last_writes = Some(run_async(pending.settle()));
    Ok(())
}

#[when(r#"task "{dragged}" is dropped onto task "{target}""#)]
fn drop_onto_task(
    world: &mut BoardWorld,
    dragged: String,
    target: String,
) -> Result<(), eyre::Report> {
    let drag = DragEnd::new(
        world.task_id(&dragged)?,
        DropTarget::Task(world.task_id(&target)?),
    );
    drop_and_settle(world, drag)
}

#[when(r#"task "{dragged}" is dropped onto the "{column}" column"#)]
fn drop_onto_column(
    world: &mut BoardWorld,
    dragged: String,
    column: String,
) -> Result<(), eyre::Report> {
    let drag = DragEnd::new(world.task_id(&dragged)?, DropTarget::Bucket(status(&column)?));
    drop_and_settle(world, drag)
}
