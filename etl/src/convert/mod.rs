//! Conversion of CSV snapshots to Parquet.

mod columnar;

pub use columnar::{ConversionOutcome, convert_csv_to_parquet, csv_to_parquet};
