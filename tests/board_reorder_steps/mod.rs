//! Step definitions for board reordering behaviour tests.

pub mod then;
pub mod when;
