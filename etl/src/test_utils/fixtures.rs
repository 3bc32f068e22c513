use std::path::Path;

use etl_config::shared::{PipelineConfig, StorageConfig};

use crate::types::TableSnapshot;

/// Three columns by three rows, all numeric.
pub const SAMPLE_CSV: &str = "test,test2,test3\n1,2,3\n5,6,7\n8,9,10";

pub const RAW_BUCKET: &str = "totesys-raw-data-000000";
pub const PROCESSED_BUCKET: &str = "totesys-processed-data-000000";

/// Builds a snapshot from string slices.
pub fn table_snapshot(table: &str, header: &[&str], rows: &[&[&str]]) -> TableSnapshot {
    TableSnapshot::new(
        table,
        header.iter().map(|value| value.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect(),
    )
}

/// Returns the default pipeline configuration with scratch files under `scratch_dir`.
pub fn pipeline_config(scratch_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        scratch_dir: scratch_dir.to_path_buf(),
        ..PipelineConfig::default()
    }
}

/// Returns a pipeline configuration limited to `tables`.
pub fn pipeline_config_for(scratch_dir: &Path, tables: &[&str]) -> PipelineConfig {
    PipelineConfig {
        tables: tables.iter().map(|table| table.to_string()).collect(),
        ..pipeline_config(scratch_dir)
    }
}

pub fn storage_config() -> StorageConfig {
    StorageConfig::default()
}
