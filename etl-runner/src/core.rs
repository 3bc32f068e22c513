use etl::pipeline::{
    ExtractOutput, ExtractPipeline, TransformEvent, TransformOutput, TransformPipeline,
};
use etl::secrets::aws::SecretsManagerProvider;
use etl::secrets::fetch_database_credentials;
use etl::source::postgres::PgTableSource;
use etl::storage::s3::S3ObjectStorage;
use etl::types::TimePartition;
use etl_config::shared::RunnerConfig;
use tracing::info;

use crate::error::RunnerResult;

/// Connects to the source database through the credentials secret and runs the extract stage.
pub async fn run_extract(
    config: RunnerConfig,
    time_prefix: Option<TimePartition>,
) -> RunnerResult<ExtractOutput> {
    let secrets = SecretsManagerProvider::from_config(&config.secrets).await;
    let credentials =
        fetch_database_credentials(&secrets, &config.secrets.credentials_prefix).await?;
    let source = PgTableSource::connect(
        &credentials.into_connection_config(config.pipeline.source_tls.clone()),
    )
    .await?;

    let storage = S3ObjectStorage::from_config(&config.storage).await;
    let pipeline = ExtractPipeline::new(config.pipeline, config.storage, storage, source);

    let output = match time_prefix {
        Some(partition) => pipeline.run_at(partition).await?,
        None => pipeline.run().await?,
    };
    info!(time_prefix = %output.time_prefix, "extract stage completed");

    Ok(output)
}

/// Runs the transform stage for the partition named by `event`.
pub async fn run_transform(
    config: RunnerConfig,
    event: TransformEvent,
) -> RunnerResult<TransformOutput> {
    let storage = S3ObjectStorage::from_config(&config.storage).await;
    let pipeline = TransformPipeline::new(config.pipeline, config.storage, storage);

    let output = pipeline.run(event).await?;
    info!(time_prefix = %output.time_prefix, "transform stage completed");

    Ok(output)
}
