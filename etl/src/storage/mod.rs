//! Object storage holding raw snapshots and processed Parquet files.

mod base;
pub mod memory;
pub mod s3;

pub use base::ObjectStorage;
