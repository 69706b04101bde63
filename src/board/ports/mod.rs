//! Port contracts for board task reordering.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod repository;

pub use repository::{
    TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskSubscription,
};
