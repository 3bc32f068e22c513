//! Shared configuration types for the extract and transform pipelines.

mod base;
mod connection;
mod pipeline;
mod runner;
mod secrets;
mod storage;

pub use base::ValidationError;
pub use connection::{DefaultPgConnectionOptions, PgConnectionConfig, TlsConfig};
pub use pipeline::{ChangeDetectionMode, PipelineConfig, default_tables};
pub use runner::RunnerConfig;
pub use secrets::SecretsConfig;
pub use storage::{KeyLayoutConfig, StorageConfig};
