//! Error types and result definitions for ETL operations.
//!
//! [`EtlError`] carries an [`ErrorKind`], a static description, optional dynamic detail, an
//! optional source and the callsite location at which it was created.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for ETL operations using [`EtlError`] as the error type.
pub type EtlResult<T> = Result<T, EtlError>;

/// Main error type for ETL operations.
#[derive(Debug, Clone)]
pub struct EtlError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Categories of errors that can occur while extracting, diffing, converting and uploading
/// snapshots.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Configuration & Discovery Errors
    ConfigError,
    MissingBucket,
    MissingSecret,
    MissingSnapshot,

    // Source Errors
    SourceConnectionFailed,
    SourceQueryFailed,
    SourceSchemaError,
    AuthenticationError,

    // IO Errors
    StorageIoError,
    SecretsIoError,
    IoError,

    // Data & Transformation Errors
    InvalidData,
    ConversionError,
    SerializationError,
    DeserializationError,

    // Unknown / Uncategorized
    Unknown,
}

impl EtlError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        Some(self.backtrace.as_ref())
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified instance.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        EtlError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
            backtrace: Arc::new(Backtrace::capture()),
        }
    }

    /// Wraps a foreign error, using its rendering as detail.
    #[track_caller]
    fn wrap<E>(kind: ErrorKind, description: &'static str, err: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        let detail = err.to_string();
        EtlError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

impl fmt::Display for EtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        write_detail(self.detail.as_deref(), f, 1)?;
        write_backtrace(self.backtrace.as_ref(), f, 1)?;

        Ok(())
    }
}

impl error::Error for EtlError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

fn write_backtrace(
    backtrace: &Backtrace,
    f: &mut fmt::Formatter<'_>,
    indent: usize,
) -> fmt::Result {
    let indent_str = "  ".repeat(indent);

    let rendered_backtrace = format!("{backtrace}");
    if !rendered_backtrace.trim().is_empty() {
        write!(f, "\n{indent_str}Backtrace:")?;
        for line in rendered_backtrace.lines() {
            if line.trim().is_empty() {
                write!(f, "\n{indent_str}  ")?;
            } else {
                write!(f, "\n{indent_str}  {line}")?;
            }
        }
    }

    Ok(())
}

fn write_detail(detail: Option<&str>, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    let Some(detail) = detail else {
        return Ok(());
    };

    let indent_str = "  ".repeat(indent);
    if detail.trim().is_empty() {
        return write!(f, "\n{indent_str}Detail: <empty>");
    }

    write!(f, "\n{indent_str}Detail:")?;
    for line in detail.lines() {
        if line.trim().is_empty() {
            write!(f, "\n{indent_str}  ")?;
        } else {
            write!(f, "\n{indent_str}  {line}")?;
        }
    }

    Ok(())
}

/// Creates an [`EtlError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for EtlError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> EtlError {
        EtlError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates an [`EtlError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for EtlError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> EtlError {
        EtlError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`std::io::Error`] to [`EtlError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for EtlError {
    #[track_caller]
    fn from(err: std::io::Error) -> EtlError {
        EtlError::wrap(ErrorKind::IoError, "I/O operation failed", err)
    }
}

/// Converts [`serde_json::Error`] to [`EtlError`] with the appropriate error kind.
impl From<serde_json::Error> for EtlError {
    #[track_caller]
    fn from(err: serde_json::Error) -> EtlError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Data
            | serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        EtlError::wrap(kind, description, err)
    }
}

/// Converts [`csv::Error`] to [`EtlError`].
///
/// I/O failures map to [`ErrorKind::IoError`], everything else to
/// [`ErrorKind::DeserializationError`].
impl From<csv::Error> for EtlError {
    #[track_caller]
    fn from(err: csv::Error) -> EtlError {
        let (kind, description) = match err.kind() {
            csv::ErrorKind::Io(_) => (ErrorKind::IoError, "CSV I/O operation failed"),
            csv::ErrorKind::Serialize(_) => {
                (ErrorKind::SerializationError, "CSV serialization failed")
            }
            _ => (ErrorKind::DeserializationError, "CSV parsing failed"),
        };

        EtlError::wrap(kind, description, err)
    }
}

/// Converts [`csv::IntoInnerError`] raised when flushing an in-memory CSV writer.
impl<W> From<csv::IntoInnerError<W>> for EtlError {
    #[track_caller]
    fn from(err: csv::IntoInnerError<W>) -> EtlError {
        EtlError::wrap(
            ErrorKind::SerializationError,
            "CSV writer flush failed",
            err.into_error(),
        )
    }
}

/// Converts [`arrow::error::ArrowError`] to [`EtlError`] with [`ErrorKind::ConversionError`].
impl From<arrow::error::ArrowError> for EtlError {
    #[track_caller]
    fn from(err: arrow::error::ArrowError) -> EtlError {
        EtlError::wrap(ErrorKind::ConversionError, "Arrow conversion failed", err)
    }
}

/// Converts [`parquet::errors::ParquetError`] to [`EtlError`] with
/// [`ErrorKind::SerializationError`].
impl From<parquet::errors::ParquetError> for EtlError {
    #[track_caller]
    fn from(err: parquet::errors::ParquetError) -> EtlError {
        EtlError::wrap(ErrorKind::SerializationError, "Parquet encoding failed", err)
    }
}

/// Converts [`etl_postgres::types::TableNameError`] to [`EtlError`] with
/// [`ErrorKind::ConfigError`].
impl From<etl_postgres::types::TableNameError> for EtlError {
    #[track_caller]
    fn from(err: etl_postgres::types::TableNameError) -> EtlError {
        EtlError::wrap(ErrorKind::ConfigError, "Invalid table name", err)
    }
}

/// Converts [`etl_postgres::client::ConnectError`] to [`EtlError`].
impl From<etl_postgres::client::ConnectError> for EtlError {
    #[track_caller]
    fn from(err: etl_postgres::client::ConnectError) -> EtlError {
        match err {
            etl_postgres::client::ConnectError::Postgres(err) => err.into(),
            err => EtlError::wrap(ErrorKind::ConfigError, "TLS configuration failed", err),
        }
    }
}

/// Converts [`tokio_postgres::Error`] to [`EtlError`] with a kind derived from the SQLSTATE.
impl From<tokio_postgres::Error> for EtlError {
    #[track_caller]
    fn from(err: tokio_postgres::Error) -> EtlError {
        let (kind, description) = match err.code() {
            Some(sqlstate) => {
                use tokio_postgres::error::SqlState;

                match *sqlstate {
                    // Connection errors (08xxx)
                    SqlState::CONNECTION_EXCEPTION
                    | SqlState::CONNECTION_DOES_NOT_EXIST
                    | SqlState::CONNECTION_FAILURE
                    | SqlState::SQLCLIENT_UNABLE_TO_ESTABLISH_SQLCONNECTION
                    | SqlState::SQLSERVER_REJECTED_ESTABLISHMENT_OF_SQLCONNECTION => (
                        ErrorKind::SourceConnectionFailed,
                        "PostgreSQL connection failed",
                    ),

                    // Authentication errors (28xxx)
                    SqlState::INVALID_AUTHORIZATION_SPECIFICATION | SqlState::INVALID_PASSWORD => (
                        ErrorKind::AuthenticationError,
                        "PostgreSQL authentication failed",
                    ),

                    // Resource errors (53xxx)
                    SqlState::INSUFFICIENT_RESOURCES
                    | SqlState::OUT_OF_MEMORY
                    | SqlState::TOO_MANY_CONNECTIONS => (
                        ErrorKind::SourceConnectionFailed,
                        "PostgreSQL resource limitation",
                    ),

                    // Shutdown and recovery (57xxx)
                    SqlState::ADMIN_SHUTDOWN
                    | SqlState::CRASH_SHUTDOWN
                    | SqlState::CANNOT_CONNECT_NOW
                    | SqlState::IDLE_SESSION_TIMEOUT => (
                        ErrorKind::SourceConnectionFailed,
                        "PostgreSQL server unavailable",
                    ),

                    // Schema/object not found errors (42xxx, 3Dxxx)
                    SqlState::UNDEFINED_TABLE
                    | SqlState::UNDEFINED_COLUMN
                    | SqlState::UNDEFINED_SCHEMA
                    | SqlState::INVALID_CATALOG_NAME => (
                        ErrorKind::SourceSchemaError,
                        "PostgreSQL schema object not found",
                    ),

                    // Data conversion errors (22xxx)
                    SqlState::DATA_EXCEPTION
                    | SqlState::INVALID_TEXT_REPRESENTATION
                    | SqlState::CHARACTER_NOT_IN_REPERTOIRE
                    | SqlState::UNTRANSLATABLE_CHARACTER => (
                        ErrorKind::ConversionError,
                        "PostgreSQL data conversion failed",
                    ),

                    // Syntax and access errors (42xxx)
                    SqlState::SYNTAX_ERROR
                    | SqlState::SYNTAX_ERROR_OR_ACCESS_RULE_VIOLATION
                    | SqlState::INSUFFICIENT_PRIVILEGE => (
                        ErrorKind::SourceQueryFailed,
                        "PostgreSQL syntax or access error",
                    ),

                    // Query canceled or timed out (57014)
                    SqlState::QUERY_CANCELED => {
                        (ErrorKind::SourceQueryFailed, "PostgreSQL query canceled")
                    }

                    _ => (ErrorKind::SourceQueryFailed, "PostgreSQL query failed"),
                }
            }
            // No SQL state means the failure happened below the protocol level.
            None => (
                ErrorKind::SourceConnectionFailed,
                "PostgreSQL connection failed",
            ),
        };

        EtlError::wrap(kind, description, err)
    }
}
