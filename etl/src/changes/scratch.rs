use std::io;
use std::path::{Path, PathBuf};

use etl_config::shared::KeyLayoutConfig;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};

/// Local directory holding the files compared by [`crate::changes::detector::ChangeDetector`].
///
/// For a table `t` the directory holds `t.csv` (previous snapshot), `t<new suffix>.csv` (new
/// snapshot) and `t<differences suffix>.csv` (change set). Files are overwritten by every run.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
    layout: KeyLayoutConfig,
}

impl ScratchSpace {
    pub fn new(dir: impl Into<PathBuf>, layout: KeyLayoutConfig) -> Self {
        Self {
            dir: dir.into(),
            layout,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn previous_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    pub fn new_path(&self, table: &str) -> PathBuf {
        self.dir
            .join(format!("{table}{}.csv", self.layout.new_snapshot_suffix))
    }

    pub fn differences_path(&self, table: &str) -> PathBuf {
        self.dir
            .join(format!("{table}{}.csv", self.layout.differences_suffix))
    }

    pub async fn write_previous(&self, table: &str, contents: &[u8]) -> EtlResult<()> {
        self.write(self.previous_path(table), contents).await
    }

    pub async fn write_new(&self, table: &str, contents: &[u8]) -> EtlResult<()> {
        self.write(self.new_path(table), contents).await
    }

    pub async fn write_differences(&self, table: &str, contents: &[u8]) -> EtlResult<()> {
        self.write(self.differences_path(table), contents).await
    }

    /// Reads a snapshot file, mapping its absence to [`ErrorKind::MissingSnapshot`].
    pub async fn read_snapshot(&self, path: &Path) -> EtlResult<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                bail!(
                    ErrorKind::MissingSnapshot,
                    "Snapshot file not found in scratch directory",
                    path.display(),
                    source: err
                );
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, path: PathBuf, contents: &[u8]) -> EtlResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(path, contents).await?;

        Ok(())
    }
}
