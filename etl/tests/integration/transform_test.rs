use bytes::Bytes;
use etl::convert::{ConversionOutcome, convert_csv_to_parquet};
use etl::error::ErrorKind;
use etl::pipeline::{ObjectKeys, TransformEvent, TransformPipeline};
use etl::storage::ObjectStorage;
use etl::storage::memory::MemoryObjectStorage;
use etl::test_utils::fixtures::{
    PROCESSED_BUCKET, RAW_BUCKET, SAMPLE_CSV, pipeline_config, pipeline_config_for,
    storage_config,
};
use etl::test_utils::storage::{FaultyObjectStorage, storage_with_buckets};
use etl::types::TimePartition;
use etl_config::shared::{KeyLayoutConfig, default_tables};
use etl_telemetry::tracing::init_test_tracing;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

const PARTITION: &str = "YYYY/MM/DD/HH:MM:SS/";

async fn seed_history_snapshots(storage: &MemoryObjectStorage, tables: &[String]) {
    let keys = ObjectKeys::new(KeyLayoutConfig::default());
    let partition = TimePartition::from(PARTITION);
    for table in tables {
        storage
            .put_object(
                RAW_BUCKET,
                &keys.history_snapshot(&partition, table),
                Bytes::from_static(SAMPLE_CSV.as_bytes()),
            )
            .await
            .unwrap();
    }
}

fn event() -> TransformEvent {
    serde_json::from_str(&format!(r#"{{"time_prefix": "{PARTITION}"}}"#)).unwrap()
}

#[tokio::test]
async fn every_table_is_converted_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;
    seed_history_snapshots(&storage, &default_tables()).await;

    let pipeline = TransformPipeline::new(
        pipeline_config(scratch.path()),
        storage_config(),
        storage.clone(),
    );
    let output = pipeline.run(event()).await.unwrap();

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        serde_json::json!({ "time_prefix": PARTITION })
    );

    let mut expected: Vec<_> = default_tables()
        .iter()
        .map(|table| format!("/history/{PARTITION}{table}.parquet"))
        .collect();
    expected.sort();
    assert_eq!(storage.keys(PROCESSED_BUCKET).await, expected);

    let parquet = storage
        .object(PROCESSED_BUCKET, &format!("/history/{PARTITION}staff.parquet"))
        .await
        .unwrap();
    let batch = ParquetRecordBatchReaderBuilder::try_new(parquet)
        .unwrap()
        .build()
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.num_columns(), 3);
}

#[tokio::test]
async fn missing_snapshots_are_skipped_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;
    seed_history_snapshots(&storage, &["design".to_string()]).await;

    let pipeline = TransformPipeline::new(
        pipeline_config_for(scratch.path(), &["design", "staff"]),
        storage_config(),
        storage.clone(),
    );
    let output = pipeline.run(event()).await.unwrap();

    assert_eq!(output.time_prefix.as_str(), PARTITION);
    assert_eq!(
        storage.keys(PROCESSED_BUCKET).await,
        vec![format!("/history/{PARTITION}design.parquet")]
    );
}

#[tokio::test]
async fn missing_processed_bucket_aborts_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = MemoryObjectStorage::new();
    storage.create_bucket(RAW_BUCKET).await;

    let pipeline = TransformPipeline::new(
        pipeline_config(scratch.path()),
        storage_config(),
        storage.clone(),
    );
    let err = pipeline.run(event()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingBucket);
    assert_eq!(err.detail(), Some("No processed data bucket found"));
}

#[tokio::test]
async fn upload_failure_aborts_remaining_tables_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let memory = storage_with_buckets().await;
    let tables = ["sales_order", "design", "currency"];
    seed_history_snapshots(
        &memory,
        &tables.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
    )
    .await;
    let storage = FaultyObjectStorage::wrap(memory.clone());
    storage.fail_puts_ending_with("design.parquet").await;

    let pipeline = TransformPipeline::new(
        pipeline_config_for(scratch.path(), &tables),
        storage_config(),
        storage.clone(),
    );
    let err = pipeline.run(event()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StorageIoError);
    assert_eq!(
        storage.attempted_puts().await,
        vec![
            format!("/history/{PARTITION}sales_order.parquet"),
            format!("/history/{PARTITION}design.parquet"),
        ]
    );
    assert_eq!(
        memory.keys(PROCESSED_BUCKET).await,
        vec![format!("/history/{PARTITION}sales_order.parquet")]
    );
}

#[tokio::test]
async fn conversion_outcomes_test() {
    init_test_tracing();
    let storage = storage_with_buckets().await;
    storage
        .put_object(RAW_BUCKET, "design.csv", Bytes::from_static(SAMPLE_CSV.as_bytes()))
        .await
        .unwrap();

    let converted = convert_csv_to_parquet(&storage, RAW_BUCKET, "design.csv")
        .await
        .unwrap();
    let not_csv = convert_csv_to_parquet(&storage, RAW_BUCKET, "design.parquet")
        .await
        .unwrap();
    let not_found = convert_csv_to_parquet(&storage, RAW_BUCKET, "staff.csv")
        .await
        .unwrap();

    assert!(matches!(converted, ConversionOutcome::Parquet(_)));
    assert_eq!(not_csv.to_string(), "design.parquet is not a .csv file.");
    assert_eq!(not_found.to_string(), "csv file not found");
    // The rejected key never reaches storage.
    assert_eq!(storage.object_reads().await, 2);
}
