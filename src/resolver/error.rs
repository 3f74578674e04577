// Tasky Vault — Resolver error types

use thiserror::Error;

use crate::store::StoreError;
use crate::vault::VaultError;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No personal key and no house key. Expected and user-actionable: the
    /// user should add a key for this provider in settings. `provider` is
    /// the requested name, which may not be a known provider.
    #[error("No API key available for {provider} (user {user_id}) — add one in settings")]
    MissingCredential { user_id: String, provider: String },

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResolveError {
    /// True for tampered or undecryptable stored keys.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, ResolveError::Vault(VaultError::Integrity))
    }
}
