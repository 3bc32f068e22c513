//! Discovery of the raw and processed buckets by name prefix.

use std::fmt;

use etl_config::shared::StorageConfig;
use tracing::{info, warn};

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::storage::ObjectStorage;

/// Raw and processed bucket names resolved for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPair {
    pub raw: String,
    pub processed: String,
}

/// Result of scanning the bucket listing, with either bucket possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketDiscovery {
    pub raw: Option<String>,
    pub processed: Option<String>,
}

impl BucketDiscovery {
    /// Scans `names` in order, keeping the first match for each prefix.
    ///
    /// Stops as soon as both buckets are found.
    pub fn scan<I, S>(names: I, raw_prefix: &str, processed_prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut discovery = Self::default();
        for name in names {
            let name = name.as_ref();
            if discovery.raw.is_none() && name.starts_with(raw_prefix) {
                discovery.raw = Some(name.to_string());
            } else if discovery.processed.is_none() && name.starts_with(processed_prefix) {
                discovery.processed = Some(name.to_string());
            }

            if discovery.is_complete() {
                break;
            }
        }

        discovery
    }

    pub fn is_complete(&self) -> bool {
        self.raw.is_some() && self.processed.is_some()
    }

    /// Returns the message describing which buckets are missing, or [`None`] if both were found.
    pub fn missing_message(&self) -> Option<&'static str> {
        match (&self.raw, &self.processed) {
            (None, None) => Some("No buckets found"),
            (None, Some(_)) => Some("No raw data bucket found"),
            (Some(_), None) => Some("No processed data bucket found"),
            (Some(_), Some(_)) => None,
        }
    }

    /// Returns both buckets, or [`ErrorKind::MissingBucket`] naming what is missing.
    pub fn into_pair(self) -> EtlResult<BucketPair> {
        match (self.raw, self.processed) {
            (Some(raw), Some(processed)) => Ok(BucketPair { raw, processed }),
            (raw, processed) => {
                let message = Self { raw, processed }
                    .missing_message()
                    .unwrap_or("No buckets found");
                bail!(ErrorKind::MissingBucket, "Required bucket not found", message);
            }
        }
    }

    /// Returns the raw bucket, or [`ErrorKind::MissingBucket`] if it is absent.
    pub fn into_raw(self) -> EtlResult<String> {
        match self.raw {
            Some(raw) => Ok(raw),
            None => bail!(
                ErrorKind::MissingBucket,
                "Required bucket not found",
                "No raw data bucket found"
            ),
        }
    }
}

impl fmt::Display for BucketDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.raw, &self.processed, self.missing_message()) {
            (Some(raw), Some(processed), _) => write!(f, "Found buckets {raw} and {processed}"),
            (_, _, Some(message)) => f.write_str(message),
            _ => Ok(()),
        }
    }
}

/// Lists the buckets of `storage` and matches them against the configured prefixes.
pub async fn locate_buckets<S: ObjectStorage>(
    storage: &S,
    config: &StorageConfig,
) -> EtlResult<BucketDiscovery> {
    let names = storage.list_buckets().await?;
    let discovery = BucketDiscovery::scan(
        &names,
        &config.raw_bucket_prefix,
        &config.processed_bucket_prefix,
    );

    match discovery.missing_message() {
        None => info!(
            raw = ?discovery.raw,
            processed = ?discovery.processed,
            "located buckets"
        ),
        Some(message) => warn!(buckets = names.len(), "{message}"),
    }

    Ok(discovery)
}
