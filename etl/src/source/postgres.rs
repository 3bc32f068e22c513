use etl_config::shared::PgConnectionConfig;
use etl_postgres::client::connect_to_source_database;
use etl_postgres::queries::{select_all_rows, table_column_names};
use etl_postgres::types::TableName;
use tokio_postgres::Client;
use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::source::TableSource;
use crate::types::TableSnapshot;

/// [`TableSource`] reading from Postgres over a single connection.
#[derive(Debug)]
pub struct PgTableSource {
    client: Client,
}

impl PgTableSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Opens the connection described by `config`.
    pub async fn connect(config: &PgConnectionConfig) -> EtlResult<Self> {
        let client = connect_to_source_database(config).await?;

        Ok(Self::new(client))
    }
}

impl TableSource for PgTableSource {
    async fn extract(&self, table: &str) -> EtlResult<TableSnapshot> {
        let table_name: TableName = table.parse()?;

        let header = table_column_names(&self.client, &table_name).await?;
        if header.is_empty() {
            bail!(
                ErrorKind::SourceSchemaError,
                "Table not found in source database",
                table_name
            );
        }

        let rows = select_all_rows(&self.client, &table_name).await?;
        info!(
            table = %table_name,
            columns = header.len(),
            rows = rows.len(),
            "extracted table"
        );

        Ok(TableSnapshot::new(table, header, rows))
    }
}
