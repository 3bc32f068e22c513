use etl::error::ErrorKind;
use etl::pipeline::ExtractPipeline;
use etl::source::memory::MemoryTableSource;
use etl::storage::memory::MemoryObjectStorage;
use etl::test_utils::fixtures::{RAW_BUCKET, pipeline_config_for, storage_config, table_snapshot};
use etl::test_utils::storage::storage_with_buckets;
use etl::types::TimePartition;
use etl_config::shared::ChangeDetectionMode;
use etl_telemetry::tracing::init_test_tracing;
use insta::assert_snapshot;

const FIRST: &str = "2024/01/01/00:00:00/";
const SECOND: &str = "2024/01/01/00:20:00/";

const HEADER: &[&str] = &["staff_id", "first_name", "last_name", "email_address"];

async fn object_text(storage: &MemoryObjectStorage, key: &str) -> String {
    let bytes = storage.object(RAW_BUCKET, key).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn source_with_staff(rows: &[&[&str]]) -> MemoryTableSource {
    let source = MemoryTableSource::new();
    source.set_table(table_snapshot("staff", HEADER, rows)).await;
    source
}

#[tokio::test]
async fn first_run_stores_full_table_as_changes_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;
    let source = source_with_staff(&[
        &["1", "Jeremie", "Franey", "jeremie.franey@terrifictotes.com"],
        &["2", "Deron", "Beier", "deron.beier@terrifictotes.com"],
    ])
    .await;

    let pipeline = ExtractPipeline::new(
        pipeline_config_for(scratch.path(), &["staff"]),
        storage_config(),
        storage.clone(),
        source,
    );
    let output = pipeline.run_at(TimePartition::from(FIRST)).await.unwrap();

    assert_eq!(output.time_prefix.as_str(), FIRST);
    assert_eq!(
        storage.keys(RAW_BUCKET).await,
        vec![
            format!("/history/{FIRST}staff.csv"),
            format!("/history/{FIRST}staff_differences.csv"),
            "/source/staff_new.csv".to_string(),
        ]
    );

    let differences =
        object_text(&storage, &format!("/history/{FIRST}staff_differences.csv")).await;
    assert_eq!(
        differences,
        object_text(&storage, "/source/staff_new.csv").await
    );
    assert_snapshot!(differences, @r"
    staff_id,first_name,last_name,email_address
    1,Jeremie,Franey,jeremie.franey@terrifictotes.com
    2,Deron,Beier,deron.beier@terrifictotes.com
    ");
}

#[tokio::test]
async fn second_run_stores_only_changed_rows_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;
    let source = source_with_staff(&[
        &["1", "Jeremie", "Franey", "jeremie.franey@terrifictotes.com"],
        &["2", "Deron", "Beier", "deron.beier@terrifictotes.com"],
    ])
    .await;

    let pipeline = ExtractPipeline::new(
        pipeline_config_for(scratch.path(), &["staff"]),
        storage_config(),
        storage.clone(),
        source.clone(),
    );
    pipeline.run_at(TimePartition::from(FIRST)).await.unwrap();

    source
        .set_table(table_snapshot(
            "staff",
            HEADER,
            &[
                &["1", "Jeremie", "Franey", "jeremie.franey@terrifictotes.com"],
                &["2", "Deron", "Beier", "d.beier@terrifictotes.com"],
                &["3", "Jeanette", "Erdman", "jeanette.erdman@terrifictotes.com"],
            ],
        ))
        .await;
    pipeline.run_at(TimePartition::from(SECOND)).await.unwrap();

    let differences =
        object_text(&storage, &format!("/history/{SECOND}staff_differences.csv")).await;
    assert_snapshot!(differences, @r"
    staff_id,first_name,last_name,email_address
    2,Deron,Beier,d.beier@terrifictotes.com
    3,Jeanette,Erdman,jeanette.erdman@terrifictotes.com
    ");

    // The source snapshot and the partition history both hold the full new table.
    let latest = object_text(&storage, "/source/staff_new.csv").await;
    assert_eq!(latest.lines().count(), 4);
    assert_eq!(
        latest,
        object_text(&storage, &format!("/history/{SECOND}staff.csv")).await
    );
}

#[tokio::test]
async fn added_column_stores_whole_table_as_changes_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;
    let source = source_with_staff(&[&[
        "1",
        "Jeremie",
        "Franey",
        "jeremie.franey@terrifictotes.com",
    ]])
    .await;

    let pipeline = ExtractPipeline::new(
        pipeline_config_for(scratch.path(), &["staff"]),
        storage_config(),
        storage.clone(),
        source.clone(),
    );
    pipeline.run_at(TimePartition::from(FIRST)).await.unwrap();

    source
        .set_table(table_snapshot(
            "staff",
            &[
                "staff_id",
                "first_name",
                "last_name",
                "email_address",
                "department_id",
            ],
            &[
                &["1", "Jeremie", "Franey", "jeremie.franey@terrifictotes.com", "8"],
                &["2", "Deron", "Beier", "deron.beier@terrifictotes.com", "6"],
            ],
        ))
        .await;
    pipeline.run_at(TimePartition::from(SECOND)).await.unwrap();

    let differences =
        object_text(&storage, &format!("/history/{SECOND}staff_differences.csv")).await;
    assert_snapshot!(differences, @r"
    staff_id,first_name,last_name,email_address,department_id
    1,Jeremie,Franey,jeremie.franey@terrifictotes.com,8
    2,Deron,Beier,deron.beier@terrifictotes.com,6
    ");
    assert_eq!(
        differences,
        object_text(&storage, "/source/staff_new.csv").await
    );
}

#[tokio::test]
async fn unchanged_table_stores_no_differences_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;
    let source = source_with_staff(&[&["1", "Jeremie", "Franey", ""]]).await;

    let mut config = pipeline_config_for(scratch.path(), &["staff"]);
    config.change_detection = ChangeDetectionMode::RowSet;
    let pipeline = ExtractPipeline::new(config, storage_config(), storage.clone(), source);
    pipeline.run_at(TimePartition::from(FIRST)).await.unwrap();
    pipeline.run_at(TimePartition::from(SECOND)).await.unwrap();

    let keys = storage.keys(RAW_BUCKET).await;
    assert!(keys.contains(&format!("/history/{SECOND}staff.csv")));
    assert!(!keys.contains(&format!("/history/{SECOND}staff_differences.csv")));

    let scratch_differences =
        std::fs::read_to_string(scratch.path().join("staff_differences.csv")).unwrap();
    assert_eq!(
        scratch_differences,
        "staff_id,first_name,last_name,email_address\n"
    );
}

#[tokio::test]
async fn missing_raw_bucket_aborts_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = MemoryObjectStorage::new();

    let pipeline = ExtractPipeline::new(
        pipeline_config_for(scratch.path(), &["staff"]),
        storage_config(),
        storage,
        MemoryTableSource::new(),
    );
    let err = pipeline.run_at(TimePartition::from(FIRST)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingBucket);
}

#[tokio::test]
async fn unknown_table_aborts_test() {
    init_test_tracing();
    let scratch = tempfile::tempdir().unwrap();
    let storage = storage_with_buckets().await;

    let pipeline = ExtractPipeline::new(
        pipeline_config_for(scratch.path(), &["staff", "design"]),
        storage_config(),
        storage.clone(),
        source_with_staff(&[]).await,
    );
    let err = pipeline.run_at(TimePartition::from(FIRST)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceSchemaError);
    assert!(
        storage
            .keys(RAW_BUCKET)
            .await
            .contains(&"/source/staff_new.csv".to_string())
    );
}
