use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::storage::ObjectStorage;

#[derive(Debug, Default)]
struct Inner {
    // Vec keeps buckets in creation order, like a real listing.
    buckets: Vec<(String, BTreeMap<String, Bytes>)>,
    object_reads: usize,
}

impl Inner {
    fn bucket(&self, name: &str) -> Option<&BTreeMap<String, Bytes>> {
        self.buckets
            .iter()
            .find(|(bucket, _)| bucket == name)
            .map(|(_, objects)| objects)
    }

    fn bucket_mut(&mut self, name: &str) -> Option<&mut BTreeMap<String, Bytes>> {
        self.buckets
            .iter_mut()
            .find(|(bucket, _)| bucket == name)
            .map(|(_, objects)| objects)
    }
}

/// In-memory object storage for tests and local development.
///
/// Cloning is cheap and every clone shares the same buckets, so a test can keep a handle to
/// inspect what a pipeline wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bucket. Creating an existing bucket is a no-op.
    pub async fn create_bucket(&self, name: &str) {
        let mut inner = self.inner.lock().await;
        if inner.bucket(name).is_none() {
            inner.buckets.push((name.to_string(), BTreeMap::new()));
        }
    }

    /// Returns the keys stored in `bucket`, sorted, or an empty list for an unknown bucket.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner
            .bucket(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns an object without counting it as a read.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        let inner = self.inner.lock().await;
        inner
            .bucket(bucket)
            .and_then(|objects| objects.get(key).cloned())
    }

    /// Number of [`ObjectStorage::get_object`] calls served so far.
    pub async fn object_reads(&self) -> usize {
        self.inner.lock().await.object_reads
    }
}

impl ObjectStorage for MemoryObjectStorage {
    async fn list_buckets(&self) -> EtlResult<Vec<String>> {
        let inner = self.inner.lock().await;

        Ok(inner.buckets.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> EtlResult<Option<Bytes>> {
        let mut inner = self.inner.lock().await;
        inner.object_reads += 1;

        let Some(objects) = inner.bucket(bucket) else {
            bail!(ErrorKind::StorageIoError, "Bucket does not exist", bucket);
        };

        Ok(objects.get(key).cloned())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> EtlResult<()> {
        let mut inner = self.inner.lock().await;

        let Some(objects) = inner.bucket_mut(bucket) else {
            bail!(ErrorKind::StorageIoError, "Bucket does not exist", bucket);
        };

        info!(bucket, key, bytes = body.len(), "storing object in memory");
        objects.insert(key.to_string(), body);

        Ok(())
    }
}
