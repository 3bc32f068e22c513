use bytes::Bytes;

use crate::error::EtlResult;
use crate::types::encode_csv;

/// Header plus the rows of a new snapshot that differ from the previous one.
///
/// Every row has as many fields as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ChangeSet {
    /// Creates a change set, dropping rows whose field count differs from the header.
    ///
    /// Returns the change set together with the number of dropped rows.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> (Self, usize) {
        let total = rows.len();
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|row| row.len() == header.len())
            .collect();
        let dropped = total - rows.len();

        (Self { header, rows }, dropped)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns `true` when at least one data row changed.
    pub fn has_changes(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Number of rows of the rendered CSV document, header included.
    pub fn num_csv_rows(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn to_csv(&self) -> EtlResult<Bytes> {
        encode_csv(&self.header, &self.rows)
    }
}
