// Tasky Vault — Top-level error types
//
// Aggregates errors from the config, vault, store and resolver modules into
// a single error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Tasky Vault operations.
#[derive(Debug, Error)]
pub enum TaskyError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Vault error: {0}")]
    Vault(#[from] crate::vault::VaultError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("{0}")]
    Resolve(#[from] crate::resolver::ResolveError),

    #[error("Provider error: {0}")]
    Provider(#[from] crate::provider::ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TaskyError>;
