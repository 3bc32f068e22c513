use std::fmt;

use etl_config::shared::{PgConnectionConfig, TlsConfig};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, de};
use tracing::info;

use crate::error::EtlResult;
use crate::secrets::SecretProvider;

/// Database credentials stored as a JSON secret.
///
/// The password is redacted from debug output.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseCredentials {
    pub user: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub database: String,
}

impl DatabaseCredentials {
    /// Parses the JSON document of a credentials secret.
    pub fn from_json(value: &str) -> EtlResult<Self> {
        Ok(serde_json::from_str(value)?)
    }

    /// Builds the connection configuration for the source database.
    pub fn into_connection_config(self, tls: TlsConfig) -> PgConnectionConfig {
        PgConnectionConfig {
            host: self.host,
            port: self.port,
            name: self.database,
            username: self.user,
            password: Some(self.password),
            tls,
        }
    }
}

/// Accepts the port either as a JSON number or as a numeric string.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    struct PortVisitor;

    impl de::Visitor<'_> for PortVisitor {
        type Value = u16;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a port number or a string containing one")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u16, E> {
            u16::try_from(value).map_err(|_| E::custom(format!("port {value} is out of range")))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u16, E> {
            u16::try_from(value).map_err(|_| E::custom(format!("port {value} is out of range")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u16, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid port `{value}`")))
        }
    }

    deserializer.deserialize_any(PortVisitor)
}

/// Fetches the credentials secret matching `prefix` and parses it.
pub async fn fetch_database_credentials<P: SecretProvider>(
    provider: &P,
    prefix: &str,
) -> EtlResult<DatabaseCredentials> {
    let value = provider.secret_string(prefix).await?;
    let credentials = DatabaseCredentials::from_json(&value)?;

    info!(
        host = %credentials.host,
        port = credentials.port,
        database = %credentials.database,
        "fetched database credentials"
    );

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn port_is_accepted_as_number_or_string() {
        let numeric = DatabaseCredentials::from_json(
            r#"{"user":"u","password":"p","host":"h","port":5432,"database":"totesys"}"#,
        )
        .unwrap();
        let textual = DatabaseCredentials::from_json(
            r#"{"user":"u","password":"p","host":"h","port":"5433","database":"totesys"}"#,
        )
        .unwrap();

        assert_eq!(numeric.port, 5432);
        assert_eq!(textual.port, 5433);
    }

    #[test]
    fn missing_field_is_a_deserialization_error() {
        let err = DatabaseCredentials::from_json(r#"{"user":"u","password":"p"}"#).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DeserializationError);
    }

    #[test]
    fn connection_config_carries_credentials() {
        let credentials = DatabaseCredentials::from_json(
            r#"{"user":"etl","password":"hunter2","host":"db","port":5432,"database":"totesys"}"#,
        )
        .unwrap();

        assert!(!format!("{credentials:?}").contains("hunter2"));

        let config = credentials.into_connection_config(TlsConfig::disabled());

        assert_eq!(config.username, "etl");
        assert_eq!(config.name, "totesys");
        assert_eq!(
            config.password.as_ref().map(|p| p.expose_secret().as_str()),
            Some("hunter2")
        );
    }
}
