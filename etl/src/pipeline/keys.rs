use etl_config::shared::KeyLayoutConfig;

use crate::types::TimePartition;

/// Builds object keys from a [`KeyLayoutConfig`].
///
/// Keys are plain concatenations, so a partition must carry its own trailing `/`.
#[derive(Debug, Clone)]
pub struct ObjectKeys {
    layout: KeyLayoutConfig,
}

impl ObjectKeys {
    pub fn new(layout: KeyLayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &KeyLayoutConfig {
        &self.layout
    }

    /// Latest full snapshot, compared against on the next extraction.
    pub fn source_snapshot(&self, table: &str) -> String {
        format!(
            "{}{table}{}.csv",
            self.layout.source_prefix, self.layout.new_snapshot_suffix
        )
    }

    /// Full snapshot of the partition, input of the transform stage.
    pub fn history_snapshot(&self, partition: &TimePartition, table: &str) -> String {
        format!("{}{partition}{table}.csv", self.layout.history_prefix)
    }

    /// Change set of the partition.
    pub fn history_differences(&self, partition: &TimePartition, table: &str) -> String {
        format!(
            "{}{partition}{table}{}.csv",
            self.layout.history_prefix, self.layout.differences_suffix
        )
    }

    /// Parquet output in the processed bucket.
    pub fn history_parquet(&self, partition: &TimePartition, table: &str) -> String {
        format!("{}{partition}{table}.parquet", self.layout.history_prefix)
    }
}
