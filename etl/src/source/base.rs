use std::future::Future;

use crate::error::EtlResult;
use crate::types::TableSnapshot;

/// Trait for systems that can produce a full snapshot of a table.
pub trait TableSource {
    /// Reads every row of `table`, given as `name` or `schema.name`.
    ///
    /// The snapshot header lists the column names in the order of the row values.
    fn extract(&self, table: &str) -> impl Future<Output = EtlResult<TableSnapshot>> + Send;
}
