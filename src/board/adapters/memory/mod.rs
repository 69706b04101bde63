//! In-memory adapters for board task persistence.

mod task;

pub use task::InMemoryTaskRepository;
