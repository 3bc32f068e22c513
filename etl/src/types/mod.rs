//! Core data types shared by the extract and transform pipelines.

mod change_set;
mod partition;
mod snapshot;

pub use change_set::ChangeSet;
pub use partition::TimePartition;
pub use snapshot::{TableSnapshot, decode_csv_records, encode_csv};
