use etl_config::shared::ChangeDetectionMode;
use tracing::{debug, info, warn};

use crate::bail;
use crate::changes::diff::{multiset_insertions, ordered_insertions};
use crate::changes::scratch::ScratchSpace;
use crate::error::{ErrorKind, EtlResult};
use crate::types::{ChangeSet, decode_csv_records};

/// Compares the previous and new snapshot of a table held in a [`ScratchSpace`].
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    scratch: ScratchSpace,
    mode: ChangeDetectionMode,
}

impl ChangeDetector {
    pub fn new(scratch: ScratchSpace, mode: ChangeDetectionMode) -> Self {
        Self { scratch, mode }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Computes the change set of `table` and writes it to the scratch differences file.
    ///
    /// Both snapshot files must exist. The header of the previous snapshot becomes the header of
    /// the change set; rows are compared with the header excluded. When the header changed, the
    /// rows cannot be compared and the whole new snapshot is the change set, under the new header.
    /// A change set without data rows means the table did not change.
    pub async fn detect(&self, table: &str) -> EtlResult<ChangeSet> {
        let previous = self
            .scratch
            .read_snapshot(&self.scratch.previous_path(table))
            .await?;
        let new = self
            .scratch
            .read_snapshot(&self.scratch.new_path(table))
            .await?;

        let mut previous = decode_csv_records(&previous)?.into_iter();
        let Some(header) = previous.next() else {
            bail!(
                ErrorKind::InvalidData,
                "Previous snapshot has no header row",
                table
            );
        };
        let previous: Vec<_> = previous.collect();

        let mut new = decode_csv_records(&new)?.into_iter();
        let new_header = new.next();
        let new: Vec<_> = new.collect();

        let (header, changed) = match new_header {
            Some(new_header) if new_header != header => {
                warn!(
                    table,
                    ?header,
                    ?new_header,
                    "snapshot header changed, reporting every row as changed"
                );
                (new_header, new.clone())
            }
            _ => {
                let changed = match self.mode {
                    ChangeDetectionMode::Ordered => ordered_insertions(&previous, &new),
                    ChangeDetectionMode::RowSet => multiset_insertions(&previous, &new),
                };
                (header, changed.into_iter().cloned().collect())
            }
        };

        let (change_set, dropped) = ChangeSet::new(header, changed);
        if dropped > 0 {
            warn!(
                table,
                dropped,
                columns = change_set.header().len(),
                "dropped changed rows whose column count differs from the header"
            );
        }

        self.scratch
            .write_differences(table, &change_set.to_csv()?)
            .await?;

        if change_set.has_changes() {
            info!(
                table,
                changed_rows = change_set.rows().len(),
                previous_rows = previous.len(),
                new_rows = new.len(),
                "detected changed rows"
            );
        } else {
            info!(table, "no changes detected");
        }
        debug!(table, mode = ?self.mode, "change detection finished");

        Ok(change_set)
    }
}
