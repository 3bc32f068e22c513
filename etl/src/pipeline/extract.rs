use etl_config::shared::{PipelineConfig, StorageConfig};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span};

use crate::buckets::locate_buckets;
use crate::changes::detector::ChangeDetector;
use crate::changes::scratch::ScratchSpace;
use crate::error::EtlResult;
use crate::pipeline::ObjectKeys;
use crate::source::TableSource;
use crate::storage::ObjectStorage;
use crate::types::TimePartition;

/// Returned by [`ExtractPipeline::run_at`] for the downstream stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOutput {
    pub time_prefix: TimePartition,
}

/// Snapshots every configured table into the raw bucket and records what changed.
#[derive(Debug)]
pub struct ExtractPipeline<S, T> {
    config: PipelineConfig,
    storage_config: StorageConfig,
    storage: S,
    source: T,
    keys: ObjectKeys,
    detector: ChangeDetector,
}

impl<S, T> ExtractPipeline<S, T>
where
    S: ObjectStorage,
    T: TableSource,
{
    pub fn new(
        config: PipelineConfig,
        storage_config: StorageConfig,
        storage: S,
        source: T,
    ) -> Self {
        let keys = ObjectKeys::new(config.layout.clone());
        let scratch = ScratchSpace::new(config.scratch_dir.clone(), config.layout.clone());
        let detector = ChangeDetector::new(scratch, config.change_detection);

        Self {
            config,
            storage_config,
            storage,
            source,
            keys,
            detector,
        }
    }

    /// Runs the extraction under the partition of the current UTC time.
    pub async fn run(&self) -> EtlResult<ExtractOutput> {
        self.run_at(TimePartition::now()).await
    }

    /// Runs the extraction under `partition`.
    ///
    /// Tables are processed in configuration order; the first failure aborts the run. The
    /// processed bucket does not need to exist yet.
    pub async fn run_at(&self, partition: TimePartition) -> EtlResult<ExtractOutput> {
        let raw_bucket = locate_buckets(&self.storage, &self.storage_config)
            .await?
            .into_raw()?;

        info!(
            partition = %partition,
            bucket = %raw_bucket,
            tables = self.config.tables.len(),
            "starting extraction"
        );

        for table in &self.config.tables {
            let span = info_span!("extract_table", table = %table);
            self.extract_table(&raw_bucket, &partition, table)
                .instrument(span)
                .await?;
        }

        info!(partition = %partition, "extraction finished");

        Ok(ExtractOutput {
            time_prefix: partition,
        })
    }

    async fn extract_table(
        &self,
        bucket: &str,
        partition: &TimePartition,
        table: &str,
    ) -> EtlResult<()> {
        let snapshot = self.source.extract(table).await?;
        let csv = snapshot.to_csv()?;

        let source_key = self.keys.source_snapshot(table);
        let differences_key = self.keys.history_differences(partition, table);

        match self.storage.get_object(bucket, &source_key).await? {
            None => {
                info!(
                    rows = snapshot.num_rows(),
                    "no previous snapshot, storing full table as changes"
                );
                self.storage
                    .put_object(bucket, &source_key, csv.clone())
                    .await?;
                self.storage
                    .put_object(bucket, &differences_key, csv.clone())
                    .await?;
            }
            Some(previous) => {
                let scratch = self.detector.scratch();
                scratch.write_previous(table, &previous).await?;
                scratch.write_new(table, &csv).await?;

                let change_set = self.detector.detect(table).await?;
                if change_set.has_changes() {
                    self.storage
                        .put_object(bucket, &differences_key, change_set.to_csv()?)
                        .await?;
                }

                self.storage
                    .put_object(bucket, &source_key, csv.clone())
                    .await?;
            }
        }

        let history_key = self.keys.history_snapshot(partition, table);
        self.storage.put_object(bucket, &history_key, csv).await?;

        Ok(())
    }
}
