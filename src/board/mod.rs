//! Drag-and-drop task reordering for board and list views.
//!
//! Tasks live in status buckets and are sorted by an integer order index.
//! Dropping a card onto another card or onto a bucket is resolved into a set
//! of absolute `{ order, status? }` updates, applied optimistically on top
//! of the last authoritative task list, written to the persistence service,
//! and expired after a short TTL. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the pure reordering algorithms in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Reconciliation services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
