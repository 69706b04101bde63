//! Handles for persistence writes issued in the background.

use crate::board::{
    domain::{TaskId, TaskUpdate},
    ports::TaskRepositoryResult,
};
use tokio::task::JoinHandle;
use tracing::warn;

/// Result of one persistence write.
#[derive(Debug)]
pub struct WriteOutcome {
    /// Task the write targeted.
    pub task_id: TaskId,
    /// What the persistence service answered.
    pub result: TaskRepositoryResult<()>,
}

impl WriteOutcome {
    /// Returns `true` when the persistence service accepted the write.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Writes and overlay expiry issued for one batch of updates.
///
/// Dropping the handle leaves the background work running; callers that do
/// not care about the outcome can ignore it.
#[derive(Debug, Default)]
pub struct PendingWrites {
    updates: Vec<TaskUpdate>,
    writes: Vec<JoinHandle<WriteOutcome>>,
    expiry: Option<JoinHandle<()>>,
}

impl PendingWrites {
    pub(crate) const fn new(
        updates: Vec<TaskUpdate>,
        writes: Vec<JoinHandle<WriteOutcome>>,
        expiry: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            updates,
            writes,
            expiry,
        }
    }

    /// Returns the updates the batch applied.
    #[must_use]
    pub fn updates(&self) -> &[TaskUpdate] {
        &self.updates
    }

    /// Returns `true` when the batch carried no updates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Waits for every write in the batch and returns their outcomes.
    ///
    /// Writes complete independently, so outcomes are reported in issue
    /// order rather than completion order. Writes whose task panicked or was
    /// cancelled are logged and left out.
    pub async fn settle(&mut self) -> Vec<WriteOutcome> {
        let mut outcomes = Vec::with_capacity(self.writes.len());
        for handle in self.writes.drain(..) {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => warn!(error = %err, "task write did not run to completion"),
            }
        }
        outcomes
    }

    /// Waits until the batch's overlay entries have expired.
    pub async fn expired(self) {
        if let Some(handle) = self.expiry
            && let Err(err) = handle.await
        {
            warn!(error = %err, "overlay expiry did not run to completion");
        }
    }
}
