use etl_config::shared::{PipelineConfig, StorageConfig};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::buckets::locate_buckets;
use crate::convert::{ConversionOutcome, convert_csv_to_parquet};
use crate::error::EtlResult;
use crate::pipeline::ObjectKeys;
use crate::storage::ObjectStorage;
use crate::types::TimePartition;

/// Trigger of the transform stage, as produced by the extract stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformEvent {
    pub time_prefix: TimePartition,
}

/// Echoes the partition of the [`TransformEvent`] for the downstream load stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOutput {
    pub time_prefix: TimePartition,
}

/// Converts the full snapshots of a partition to Parquet in the processed bucket.
#[derive(Debug)]
pub struct TransformPipeline<S> {
    config: PipelineConfig,
    storage_config: StorageConfig,
    storage: S,
    keys: ObjectKeys,
}

impl<S> TransformPipeline<S>
where
    S: ObjectStorage,
{
    pub fn new(config: PipelineConfig, storage_config: StorageConfig, storage: S) -> Self {
        let keys = ObjectKeys::new(config.layout.clone());

        Self {
            config,
            storage_config,
            storage,
            keys,
        }
    }

    /// Converts every configured table of `event.time_prefix`.
    ///
    /// Tables whose snapshot is missing are skipped with a warning. A failed upload aborts the
    /// run and no further table is processed.
    pub async fn run(&self, event: TransformEvent) -> EtlResult<TransformOutput> {
        let buckets = locate_buckets(&self.storage, &self.storage_config)
            .await?
            .into_pair()?;
        let partition = event.time_prefix;

        info!(
            partition = %partition,
            raw = %buckets.raw,
            processed = %buckets.processed,
            "starting transform"
        );

        let mut converted = 0;
        for table in &self.config.tables {
            let csv_key = self.keys.history_snapshot(&partition, table);

            let parquet =
                match convert_csv_to_parquet(&self.storage, &buckets.raw, &csv_key).await? {
                    ConversionOutcome::Parquet(parquet) => parquet,
                    outcome => {
                        warn!(table = %table, key = %csv_key, "{outcome}, skipping table");
                        continue;
                    }
                };

            let parquet_key = self.keys.history_parquet(&partition, table);
            if let Err(err) = self
                .storage
                .put_object(&buckets.processed, &parquet_key, parquet)
                .await
            {
                error!(table = %table, key = %parquet_key, error = %err, "failed to upload file");
                return Err(err);
            }

            info!(table = %table, key = %parquet_key, "uploaded parquet file");
            converted += 1;
        }

        info!(
            partition = %partition,
            converted,
            tables = self.config.tables.len(),
            "transform finished"
        );

        Ok(TransformOutput {
            time_prefix: partition,
        })
    }
}
