//! Taskboard: drag-and-drop task reordering for productivity boards.
//!
//! This crate implements the ordering and status-transition engine behind
//! Kanban and grouped-list task views, plus the optimistic reconciliation
//! layer that hides persistence latency while a move is being written.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`board`]: Task ordering, drop resolution, and optimistic reconciliation

pub mod board;
