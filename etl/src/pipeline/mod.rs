//! The two scheduled stages: extract (snapshot + change detection) and transform (Parquet).

mod extract;
mod keys;
mod transform;

pub use extract::{ExtractOutput, ExtractPipeline};
pub use keys::ObjectKeys;
pub use transform::{TransformEvent, TransformOutput, TransformPipeline};
