use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio_postgres::{Config as TokioPgConnectOptions, config::SslMode as TokioPgSslMode};

use crate::shared::ValidationError;

/// Application name reported to Postgres by the extractor.
const APP_NAME_EXTRACTOR: &str = "snapshot_etl_extractor";

/// Session options applied to every source connection.
///
/// Pinning the date style and float precision keeps the text rendering of extracted values stable
/// between runs, which the snapshot comparison relies on.
pub struct DefaultPgConnectionOptions;

impl DefaultPgConnectionOptions {
    /// Returns the options as a string suitable for the tokio-postgres `options` parameter.
    pub fn to_options_string() -> String {
        "-c datestyle=ISO -c intervalstyle=postgres -c extra_float_digits=3 -c client_encoding=UTF8 -c timezone=UTC"
            .to_string()
    }
}

/// Configuration for connecting to the source Postgres database.
///
/// Built at runtime from the credentials secret; it is never loaded from configuration files and
/// intentionally does not implement [`Serialize`].
#[derive(Debug, Clone, Deserialize)]
pub struct PgConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Name of the database to connect to.
    pub name: String,
    pub username: String,
    /// Redacted in debug output.
    pub password: Option<SecretString>,
    pub tls: TlsConfig,
}

/// TLS settings for source connections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TlsConfig {
    /// PEM-encoded trusted root certificates.
    #[serde(default)]
    pub trusted_root_certs: String,
    #[serde(default)]
    pub enabled: bool,
}

impl TlsConfig {
    /// Returns a configuration with TLS turned off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Checks that certificates are present whenever TLS is enabled.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.trusted_root_certs.trim().is_empty() {
            return Err(ValidationError::MissingTrustedRootCerts);
        }

        Ok(())
    }
}

impl PgConnectionConfig {
    /// Builds tokio-postgres connect options targeting [`PgConnectionConfig::name`].
    pub fn connect_options(&self) -> TokioPgConnectOptions {
        let ssl_mode = if self.tls.enabled {
            TokioPgSslMode::Require
        } else {
            TokioPgSslMode::Disable
        };

        let mut config = TokioPgConnectOptions::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.name)
            .user(&self.username)
            .application_name(APP_NAME_EXTRACTOR)
            .options(&DefaultPgConnectionOptions::to_options_string())
            .ssl_mode(ssl_mode);

        if let Some(password) = &self.password {
            config.password(password.expose_secret());
        }

        config
    }
}
