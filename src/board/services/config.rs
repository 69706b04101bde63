//! Reconciliation settings.

use std::time::Duration;

/// Configuration for optimistic reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// How long optimistic entries stay visible after their writes are
    /// issued, whatever the write outcome.
    pub overlay_ttl: Duration,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            overlay_ttl: Duration::from_secs(1),
        }
    }
}

impl ReconcileConfig {
    /// Creates a configuration whose overlay expires as soon as the runtime
    /// schedules the expiry task.
    ///
    /// Useful for headless callers that only care about persisted state.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            overlay_ttl: Duration::ZERO,
        }
    }

    /// Sets the overlay time-to-live.
    #[must_use]
    pub const fn with_overlay_ttl(mut self, overlay_ttl: Duration) -> Self {
        self.overlay_ttl = overlay_ttl;
        self
    }
}
