use std::io::{self, BufReader};
use std::sync::Arc;

use etl_config::shared::{PgConnectionConfig, TlsConfig};
use rustls::{ClientConfig, RootCertStore};
use thiserror::Error;
use tokio_postgres::{Client, Config, NoTls};
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to read trusted root certificates: {0}")]
    Certificates(#[source] io::Error),

    #[error("invalid TLS configuration: {0}")]
    Tls(#[source] rustls::Error),

    #[error("no trusted root certificates found in the TLS configuration")]
    NoCertificates,

    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),
}

/// Opens a single connection to the source database.
///
/// The connection is driven by a background task which logs and exits when the connection
/// terminates. Uses rustls when [`TlsConfig::enabled`] is set.
pub async fn connect_to_source_database(
    config: &PgConnectionConfig,
) -> Result<Client, ConnectError> {
    let options: Config = config.connect_options();

    let client = if config.tls.enabled {
        let tls = MakeRustlsConnect::new(build_tls_config(&config.tls)?);
        let (client, connection) = options.connect(tls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "source connection terminated with an error");
            }
        });

        client
    } else {
        let (client, connection) = options.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "source connection terminated with an error");
            }
        });

        client
    };

    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        tls = config.tls.enabled,
        "connected to source database"
    );

    Ok(client)
}

fn build_tls_config(tls: &TlsConfig) -> Result<ClientConfig, ConnectError> {
    let mut root_store = RootCertStore::empty();
    let mut reader = BufReader::new(tls.trusted_root_certs.as_bytes());
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.map_err(ConnectError::Certificates)?;
        root_store
            .add(cert)
            .map_err(ConnectError::Tls)?;
    }

    if root_store.is_empty() {
        return Err(ConnectError::NoCertificates);
    }

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(ConnectError::Tls)?
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}
