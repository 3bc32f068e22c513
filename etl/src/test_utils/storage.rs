use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::storage::ObjectStorage;
use crate::storage::memory::MemoryObjectStorage;
use crate::test_utils::fixtures::{PROCESSED_BUCKET, RAW_BUCKET};

/// Creates memory storage holding the default raw and processed buckets.
pub async fn storage_with_buckets() -> MemoryObjectStorage {
    let storage = MemoryObjectStorage::new();
    storage.create_bucket(RAW_BUCKET).await;
    storage.create_bucket(PROCESSED_BUCKET).await;

    storage
}

/// Wraps an [`ObjectStorage`] and fails uploads of keys ending with a configured suffix.
#[derive(Debug, Clone)]
pub struct FaultyObjectStorage<S> {
    inner: S,
    failing_suffix: Arc<Mutex<Option<String>>>,
    attempted_puts: Arc<Mutex<Vec<String>>>,
}

impl<S> FaultyObjectStorage<S> {
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            failing_suffix: Arc::new(Mutex::new(None)),
            attempted_puts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn fail_puts_ending_with(&self, suffix: &str) {
        *self.failing_suffix.lock().await = Some(suffix.to_string());
    }

    /// Keys of every upload attempted through the wrapper, failed ones included.
    pub async fn attempted_puts(&self) -> Vec<String> {
        self.attempted_puts.lock().await.clone()
    }
}

impl<S> ObjectStorage for FaultyObjectStorage<S>
where
    S: ObjectStorage + Sync,
{
    async fn list_buckets(&self) -> EtlResult<Vec<String>> {
        self.inner.list_buckets().await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> EtlResult<Option<Bytes>> {
        self.inner.get_object(bucket, key).await
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> EtlResult<()> {
        self.attempted_puts.lock().await.push(key.to_string());

        let fails = self
            .failing_suffix
            .lock()
            .await
            .as_deref()
            .is_some_and(|suffix| key.ends_with(suffix));
        if fails {
            bail!(ErrorKind::StorageIoError, "Injected upload failure", key);
        }

        self.inner.put_object(bucket, key, body).await
    }
}
