use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use etl_config::shared::SecretsConfig;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::etl_error;
use crate::secrets::SecretProvider;

/// [`SecretProvider`] backed by AWS Secrets Manager.
#[derive(Debug, Clone)]
pub struct SecretsManagerProvider {
    client: Client,
}

impl SecretsManagerProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(config: &SecretsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        Self::new(Client::new(&loader.load().await))
    }

    /// Returns the name of the first listed secret starting with `prefix`.
    async fn find_secret_name(&self, prefix: &str) -> EtlResult<Option<String>> {
        let mut next_token = None;
        loop {
            let output = self
                .client
                .list_secrets()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|err| {
                    etl_error!(
                        ErrorKind::SecretsIoError,
                        "Listing secrets failed",
                        DisplayErrorContext(&err)
                    )
                })?;

            let found = output
                .secret_list()
                .iter()
                .filter_map(|secret| secret.name())
                .find(|name| name.starts_with(prefix));
            if let Some(name) = found {
                return Ok(Some(name.to_string()));
            }

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => return Ok(None),
            }
        }
    }
}

impl SecretProvider for SecretsManagerProvider {
    async fn secret_string(&self, prefix: &str) -> EtlResult<String> {
        let Some(name) = self.find_secret_name(prefix).await? else {
            bail!(
                ErrorKind::MissingSecret,
                "No secret matches the prefix",
                prefix
            );
        };

        debug!(secret = %name, "fetching secret value");

        let output = self
            .client
            .get_secret_value()
            .secret_id(&name)
            .send()
            .await
            .map_err(|err| {
                etl_error!(
                    ErrorKind::SecretsIoError,
                    "Fetching secret value failed",
                    format!("{name}: {}", DisplayErrorContext(&err))
                )
            })?;

        match output.secret_string() {
            Some(value) => Ok(value.to_string()),
            None => bail!(
                ErrorKind::InvalidData,
                "Secret has no string value",
                name
            ),
        }
    }
}
