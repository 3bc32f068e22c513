use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

const DEFAULT_RAW_BUCKET_PREFIX: &str = "totesys-raw-data-";
const DEFAULT_PROCESSED_BUCKET_PREFIX: &str = "totesys-processed-data-";

fn default_raw_bucket_prefix() -> String {
    DEFAULT_RAW_BUCKET_PREFIX.to_string()
}

fn default_processed_bucket_prefix() -> String {
    DEFAULT_PROCESSED_BUCKET_PREFIX.to_string()
}

/// Object storage settings.
///
/// Buckets are never configured by name: they are discovered by prefix at the start of each
/// invocation, so deployments can suffix bucket names freely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Name prefix of the bucket holding CSV snapshots and change sets.
    #[serde(default = "default_raw_bucket_prefix")]
    pub raw_bucket_prefix: String,
    /// Name prefix of the bucket receiving Parquet output.
    #[serde(default = "default_processed_bucket_prefix")]
    pub processed_bucket_prefix: String,
    /// AWS region override. Uses the default provider chain when absent.
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint, e.g. LocalStack. Enables path-style addressing.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            raw_bucket_prefix: default_raw_bucket_prefix(),
            processed_bucket_prefix: default_processed_bucket_prefix(),
            region: None,
            endpoint: None,
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.raw_bucket_prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix("raw_bucket_prefix"));
        }

        if self.processed_bucket_prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix("processed_bucket_prefix"));
        }

        if self.raw_bucket_prefix == self.processed_bucket_prefix {
            return Err(ValidationError::IdenticalBucketPrefixes);
        }

        Ok(())
    }
}

fn default_history_prefix() -> String {
    "/history/".to_string()
}

fn default_source_prefix() -> String {
    "/source/".to_string()
}

fn default_new_snapshot_suffix() -> String {
    "_new".to_string()
}

fn default_differences_suffix() -> String {
    "_differences".to_string()
}

/// Naming of objects in the buckets and of files in the scratch directory.
///
/// With the defaults, a table `design` extracted under partition `2024/01/02/03:04:05/` produces:
/// - `/source/design_new.csv` (latest full snapshot, compared against on the next run)
/// - `/history/2024/01/02/03:04:05/design.csv` (full snapshot for the transform stage)
/// - `/history/2024/01/02/03:04:05/design_differences.csv` (change set)
/// - `/history/2024/01/02/03:04:05/design.parquet` (processed bucket)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct KeyLayoutConfig {
    #[serde(default = "default_history_prefix")]
    pub history_prefix: String,
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,
    #[serde(default = "default_new_snapshot_suffix")]
    pub new_snapshot_suffix: String,
    #[serde(default = "default_differences_suffix")]
    pub differences_suffix: String,
}

impl Default for KeyLayoutConfig {
    fn default() -> Self {
        Self {
            history_prefix: default_history_prefix(),
            source_prefix: default_source_prefix(),
            new_snapshot_suffix: default_new_snapshot_suffix(),
            differences_suffix: default_differences_suffix(),
        }
    }
}

impl KeyLayoutConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.new_snapshot_suffix.is_empty()
            || self.differences_suffix.is_empty()
            || self.new_snapshot_suffix == self.differences_suffix
        {
            return Err(ValidationError::ConflictingSuffixes);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_bucket_names() {
        let config: StorageConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config, StorageConfig::default());
        assert_eq!(config.raw_bucket_prefix, "totesys-raw-data-");
        assert_eq!(config.processed_bucket_prefix, "totesys-processed-data-");
    }

    #[test]
    fn identical_prefixes_are_rejected() {
        let config = StorageConfig {
            processed_bucket_prefix: "totesys-raw-data-".to_string(),
            ..StorageConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ValidationError::IdenticalBucketPrefixes)
        );
    }

    #[test]
    fn colliding_suffixes_are_rejected() {
        let layout = KeyLayoutConfig {
            differences_suffix: "_new".to_string(),
            ..KeyLayoutConfig::default()
        };

        assert_eq!(layout.validate(), Err(ValidationError::ConflictingSuffixes));
        assert_eq!(KeyLayoutConfig::default().validate(), Ok(()));
    }
}
