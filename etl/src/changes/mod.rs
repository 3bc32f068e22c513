//! Row-level change detection between two snapshots of one table.

pub mod detector;
pub mod diff;
pub mod scratch;
