//! Retrieval of the source database credentials.

pub mod aws;
mod base;
mod credentials;
pub mod memory;

pub use base::SecretProvider;
pub use credentials::{DatabaseCredentials, fetch_database_credentials};
