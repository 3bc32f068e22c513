use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::source::TableSource;
use crate::types::TableSnapshot;

/// In-memory [`TableSource`] whose tables are replaced wholesale between runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableSource {
    tables: Arc<Mutex<HashMap<String, TableSnapshot>>>,
}

impl MemoryTableSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `snapshot` under its table name, replacing the previous contents.
    pub async fn set_table(&self, snapshot: TableSnapshot) {
        self.tables
            .lock()
            .await
            .insert(snapshot.table().to_string(), snapshot);
    }
}

impl TableSource for MemoryTableSource {
    async fn extract(&self, table: &str) -> EtlResult<TableSnapshot> {
        match self.tables.lock().await.get(table) {
            Some(snapshot) => Ok(snapshot.clone()),
            None => bail!(
                ErrorKind::SourceSchemaError,
                "Table not found in source database",
                table
            ),
        }
    }
}
