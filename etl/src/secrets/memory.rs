use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::secrets::SecretProvider;

/// In-memory [`SecretProvider`] holding secrets in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretProvider {
    secrets: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemorySecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.lock().await.push((name.into(), value.into()));
    }
}

impl SecretProvider for MemorySecretProvider {
    async fn secret_string(&self, prefix: &str) -> EtlResult<String> {
        let secrets = self.secrets.lock().await;

        match secrets.iter().find(|(name, _)| name.starts_with(prefix)) {
            Some((_, value)) => Ok(value.clone()),
            None => bail!(
                ErrorKind::MissingSecret,
                "No secret matches the prefix",
                prefix
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_secret_with_prefix_is_returned() {
        let provider = MemorySecretProvider::new();
        provider.insert("other", "x").await;
        provider.insert("totesys-credentials-a", "first").await;
        provider.insert("totesys-credentials-b", "second").await;

        assert_eq!(
            provider.secret_string("totesys-credentials-").await.unwrap(),
            "first"
        );
        assert_eq!(
            provider.secret_string("missing-").await.unwrap_err().kind(),
            ErrorKind::MissingSecret
        );
    }
}
