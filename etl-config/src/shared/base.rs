use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No tables are configured for extraction or transformation.
    #[error("`tables` cannot be empty")]
    NoTables,
    /// A configured table name is empty or whitespace.
    #[error("`tables` contains an empty table name")]
    EmptyTableName,
    /// A table appears more than once in the table list.
    #[error("table `{0}` is configured more than once")]
    DuplicateTable(String),
    /// A bucket or secret name prefix is empty, which would match everything.
    #[error("`{0}` cannot be empty")]
    EmptyPrefix(&'static str),
    /// The raw and processed bucket prefixes are identical.
    #[error("raw and processed bucket prefixes must differ")]
    IdenticalBucketPrefixes,
    /// The new-snapshot and differences suffixes collide, which would overwrite scratch files.
    #[error("`new_snapshot_suffix` and `differences_suffix` must be non-empty and differ")]
    ConflictingSuffixes,
    /// TLS is enabled but no trusted root certificates are provided.
    #[error("Invalid TLS config: `trusted_root_certs` must be set when `enabled` is true")]
    MissingTrustedRootCerts,
}
