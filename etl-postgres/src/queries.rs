//! The two queries issued per table: column names, then a full scan.

use tokio_postgres::{Client, SimpleQueryMessage};

use crate::types::TableName;

/// Returns the column names of `table` in ordinal order.
///
/// The order matches the column order of `select *`, so the result can be used directly as the
/// snapshot header.
pub async fn table_column_names(
    client: &Client,
    table: &TableName,
) -> Result<Vec<String>, tokio_postgres::Error> {
    let rows = client
        .query(
            "select column_name::text
            from information_schema.columns
            where table_schema = $1 and table_name = $2
            order by ordinal_position",
            &[&table.schema, &table.name],
        )
        .await?;

    rows.iter().map(|row| row.try_get::<_, String>(0)).collect()
}

/// Returns every row of `table` with values in Postgres text format.
///
/// Uses the simple query protocol so that every column type arrives as text without a per-type
/// decoder. `NULL` values are returned as empty strings.
pub async fn select_all_rows(
    client: &Client,
    table: &TableName,
) -> Result<Vec<Vec<String>>, tokio_postgres::Error> {
    let query = format!("select * from {}", table.as_quoted_identifier());
    let messages = client.simple_query(&query).await?;

    let rows = messages
        .iter()
        .filter_map(|message| match message {
            SimpleQueryMessage::Row(row) => Some(
                (0..row.len())
                    .map(|index| row.get(index).unwrap_or_default().to_string())
                    .collect(),
            ),
            _ => None,
        })
        .collect();

    Ok(rows)
}
