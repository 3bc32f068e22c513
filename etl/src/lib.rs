//! Batch snapshot ETL.
//!
//! The extract stage snapshots Postgres tables into a raw bucket as CSV and records which rows
//! changed since the previous snapshot. The transform stage converts the snapshots of one time
//! partition to Parquet in a processed bucket.

pub mod buckets;
pub mod changes;
pub mod convert;
pub mod error;
mod macros;
pub mod pipeline;
pub mod secrets;
pub mod source;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
