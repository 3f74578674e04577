// Tasky Vault — Configuration error types
//
// Every variant is fatal at startup: the process refuses to serve requests
// rather than run with a missing or weak key.

use thiserror::Error;

use crate::provider::Provider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Encryption key not configured — set ENCRYPTION_KEY (run `tasky-vault generate-key` for one)")]
    MissingEncryptionKey,

    #[error("Encryption key is too weak — use 64 hex characters or a passphrase of at least {0} characters")]
    WeakEncryptionKey(usize),

    #[error("Fallback key for '{provider}' is required but {var} is not set")]
    MissingFallbackKey { provider: Provider, var: &'static str },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),
}
