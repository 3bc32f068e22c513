use etl::buckets::{BucketPair, locate_buckets};
use etl::error::ErrorKind;
use etl::storage::memory::MemoryObjectStorage;
use etl::test_utils::fixtures::{PROCESSED_BUCKET, RAW_BUCKET, storage_config};
use etl_telemetry::tracing::init_test_tracing;

async fn storage_with(buckets: &[&str]) -> MemoryObjectStorage {
    let storage = MemoryObjectStorage::new();
    for bucket in buckets {
        storage.create_bucket(bucket).await;
    }

    storage
}

#[tokio::test]
async fn no_matching_buckets_test() {
    init_test_tracing();
    let storage = storage_with(&["unrelated-bucket"]).await;

    let discovery = locate_buckets(&storage, &storage_config()).await.unwrap();

    assert_eq!(discovery.to_string(), "No buckets found");
    let err = discovery.into_pair().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingBucket);
    assert_eq!(err.detail(), Some("No buckets found"));
}

#[tokio::test]
async fn only_processed_bucket_test() {
    init_test_tracing();
    let storage = storage_with(&[PROCESSED_BUCKET]).await;

    let discovery = locate_buckets(&storage, &storage_config()).await.unwrap();

    assert_eq!(discovery.to_string(), "No raw data bucket found");
}

#[tokio::test]
async fn only_raw_bucket_test() {
    init_test_tracing();
    let storage = storage_with(&[RAW_BUCKET]).await;

    let discovery = locate_buckets(&storage, &storage_config()).await.unwrap();

    assert_eq!(discovery.to_string(), "No processed data bucket found");
    assert_eq!(discovery.into_raw().unwrap(), RAW_BUCKET);
}

#[tokio::test]
async fn both_buckets_test() {
    init_test_tracing();
    let storage = storage_with(&["other", RAW_BUCKET, PROCESSED_BUCKET]).await;

    let pair = locate_buckets(&storage, &storage_config())
        .await
        .unwrap()
        .into_pair()
        .unwrap();

    assert_eq!(
        pair,
        BucketPair {
            raw: RAW_BUCKET.to_string(),
            processed: PROCESSED_BUCKET.to_string(),
        }
    );
}
