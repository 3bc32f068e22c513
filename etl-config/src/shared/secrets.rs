use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

fn default_credentials_prefix() -> String {
    "totesys-credentials-".to_string()
}

fn default_region() -> Option<String> {
    Some("eu-west-2".to_string())
}

/// Location of the database credentials secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SecretsConfig {
    /// Name prefix of the secret holding the source database credentials.
    ///
    /// The first secret whose name starts with this prefix is used.
    #[serde(default = "default_credentials_prefix")]
    pub credentials_prefix: String,
    #[serde(default = "default_region")]
    pub region: Option<String>,
    /// Custom endpoint, e.g. LocalStack.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            credentials_prefix: default_credentials_prefix(),
            region: default_region(),
            endpoint: None,
        }
    }
}

impl SecretsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credentials_prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix("credentials_prefix"));
        }

        Ok(())
    }
}
