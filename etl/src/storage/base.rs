use std::future::Future;

use bytes::Bytes;

use crate::error::EtlResult;

/// Trait for object stores organised in named buckets.
///
/// Keys are used verbatim, including a leading `/` when the key layout has one.
pub trait ObjectStorage {
    /// Returns the names of every bucket visible to the client, in listing order.
    fn list_buckets(&self) -> impl Future<Output = EtlResult<Vec<String>>> + Send;

    /// Reads a whole object into memory.
    ///
    /// Returns [`None`] when the key does not exist in the bucket. Any other failure, including
    /// a missing bucket, is an error.
    fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = EtlResult<Option<Bytes>>> + Send;

    /// Writes an object, replacing any existing object under the same key.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> impl Future<Output = EtlResult<()>> + Send;
}
