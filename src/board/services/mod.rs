//! Application services for board reordering and reconciliation.

mod board;
mod config;
mod overlay;
mod writes;

pub use board::{
    BoardContext, BoardService, BoardServiceError, BoardServiceResult, CreateTaskRequest,
};
pub use config::ReconcileConfig;
pub use overlay::{Generation, OptimisticOverlay, OverlayEntry};
pub use writes::{PendingWrites, WriteOutcome};
