use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::{KeyLayoutConfig, TlsConfig, ValidationError};

/// Tables of the source database that are snapshotted on every run.
const DEFAULT_TABLES: &[&str] = &[
    "sales_order",
    "design",
    "currency",
    "staff",
    "counterparty",
    "address",
    "department",
    "purchase_order",
    "payment_type",
    "payment",
    "transaction",
];

/// Returns the default table list.
pub fn default_tables() -> Vec<String> {
    DEFAULT_TABLES.iter().map(|table| table.to_string()).collect()
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir()
}

/// How rows of two snapshots are compared.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDetectionMode {
    /// Ordered diff over the row sequences: rows inserted in the new snapshot are changes,
    /// including rows that only moved.
    #[default]
    Ordered,
    /// Multiset difference: a row is a change only if it occurs more often in the new snapshot
    /// than in the previous one. Reordering alone produces no changes.
    RowSet,
}

/// Settings shared by the extract and transform pipelines.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Tables to process, as `name` or `schema.name`. Processed in order.
    #[serde(default = "default_tables")]
    pub tables: Vec<String>,
    /// Local directory for snapshot comparison files.
    ///
    /// Must be exclusive to one invocation at a time.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    #[serde(default)]
    pub change_detection: ChangeDetectionMode,
    #[serde(default)]
    pub layout: KeyLayoutConfig,
    /// TLS settings applied to the source connection built from the credentials secret.
    #[serde(default)]
    pub source_tls: TlsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tables: default_tables(),
            scratch_dir: default_scratch_dir(),
            change_detection: ChangeDetectionMode::default(),
            layout: KeyLayoutConfig::default(),
            source_tls: TlsConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validates the table list, key layout and TLS settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tables.is_empty() {
            return Err(ValidationError::NoTables);
        }

        let mut seen = HashSet::with_capacity(self.tables.len());
        for table in &self.tables {
            let table = table.trim();
            if table.is_empty() {
                return Err(ValidationError::EmptyTableName);
            }
            if !seen.insert(table) {
                return Err(ValidationError::DuplicateTable(table.to_string()));
            }
        }

        self.layout.validate()?;
        self.source_tls.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_lists_all_tables() {
        let config = PipelineConfig::default();

        assert_eq!(config.tables.len(), 11);
        assert_eq!(config.change_detection, ChangeDetectionMode::Ordered);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn empty_and_duplicate_tables_are_rejected() {
        let mut config = PipelineConfig {
            tables: vec![],
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NoTables));

        config.tables = vec!["design".to_string(), " ".to_string()];
        assert_eq!(config.validate(), Err(ValidationError::EmptyTableName));

        config.tables = vec!["design".to_string(), "design".to_string()];
        assert_eq!(
            config.validate(),
            Err(ValidationError::DuplicateTable("design".to_string()))
        );
    }

    #[test]
    fn change_detection_mode_deserializes_from_snake_case() {
        let mode: ChangeDetectionMode = serde_json::from_str("\"row_set\"").unwrap();

        assert_eq!(mode, ChangeDetectionMode::RowSet);
    }
}
