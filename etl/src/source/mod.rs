//! Extraction of full table snapshots from the source database.

mod base;
pub mod memory;
pub mod postgres;

pub use base::TableSource;
