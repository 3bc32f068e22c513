use std::future::Future;

use crate::error::EtlResult;

/// Trait for secret stores addressed by secret name.
pub trait SecretProvider {
    /// Returns the string value of the first secret whose name starts with `prefix`.
    ///
    /// Fails with [`crate::error::ErrorKind::MissingSecret`] when no secret matches.
    fn secret_string(&self, prefix: &str) -> impl Future<Output = EtlResult<String>> + Send;
}
