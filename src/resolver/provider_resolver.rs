// Tasky Vault — Provider Resolver
//
// Decides which API key a request for (user, provider) should use:
//   1. the user's own stored key, decrypted by the vault;
//   2. otherwise the operator's house key for that provider;
//   3. otherwise nothing.
//
// A stored key that fails integrity validation is an error. It never falls
// through to the house key.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::config::FallbackKeySet;
use crate::provider::Provider;
use crate::store::CredentialStore;
use crate::vault::CredentialVault;

use super::{KeySource, ModelRoute, ResolveError, ResolvedKey};

pub struct ProviderResolver<S> {
    store: S,
    vault: Arc<CredentialVault>,
    fallback_keys: Arc<FallbackKeySet>,
}

impl<S: CredentialStore> ProviderResolver<S> {
    pub fn new(store: S, vault: Arc<CredentialVault>, fallback_keys: Arc<FallbackKeySet>) -> Self {
        Self {
            store,
            vault,
            fallback_keys,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    /// Resolve the key for a (user, provider) pair. `Ok(None)` means the
    /// provider is unavailable to this user.
    pub fn resolve_api_key(
        &self,
        user_id: &str,
        provider: Provider,
    ) -> Result<Option<ResolvedKey>, ResolveError> {
        if let Some(stored) = self.store.get(user_id, provider)? {
            let key = self.vault.decrypt_key(&stored.encrypted).map_err(|e| {
                tracing::warn!(
                    user_id = %user_id,
                    provider = %provider,
                    credential_id = %stored.id,
                    "Stored API key failed integrity check"
                );
                e
            })?;

            tracing::debug!(user_id = %user_id, provider = %provider, source = "personal", "API key resolved");
            return Ok(Some(ResolvedKey::new(key, KeySource::Personal)));
        }

        if let Some(key) = self.fallback_keys.get(provider) {
            tracing::debug!(user_id = %user_id, provider = %provider, source = "fallback", "API key resolved");
            return Ok(Some(ResolvedKey::new(
                Zeroizing::new(key.to_string()),
                KeySource::Fallback,
            )));
        }

        tracing::debug!(user_id = %user_id, provider = %provider, "No API key available");
        Ok(None)
    }

    /// Like `resolve_api_key`, for callers that cannot proceed without a key.
    pub fn require_api_key(
        &self,
        user_id: &str,
        provider: Provider,
    ) -> Result<ResolvedKey, ResolveError> {
        self.resolve_api_key(user_id, provider)?
            .ok_or_else(|| ResolveError::MissingCredential {
                user_id: user_id.to_string(),
                provider: provider.to_string(),
            })
    }

    /// Resolve by provider name as it arrives from a request. A name outside
    /// the known providers has no stored or house key, so it resolves to
    /// `Ok(None)` rather than an error.
    pub fn resolve_api_key_by_name(
        &self,
        user_id: &str,
        provider_name: &str,
    ) -> Result<Option<ResolvedKey>, ResolveError> {
        match provider_name.parse::<Provider>() {
            Ok(provider) => self.resolve_api_key(user_id, provider),
            Err(_) => {
                tracing::debug!(user_id = %user_id, provider = %provider_name, "No API key for unrecognised provider");
                Ok(None)
            }
        }
    }

    /// Like `resolve_api_key_by_name`; the error carries the name as given.
    pub fn require_api_key_by_name(
        &self,
        user_id: &str,
        provider_name: &str,
    ) -> Result<ResolvedKey, ResolveError> {
        self.resolve_api_key_by_name(user_id, provider_name)?
            .ok_or_else(|| ResolveError::MissingCredential {
                user_id: user_id.to_string(),
                provider: provider_name.to_string(),
            })
    }

    /// Pick the adapter for a chat model and resolve the key it needs.
    pub fn resolve_for_model(
        &self,
        user_id: &str,
        model_id: &str,
    ) -> Result<ModelRoute, ResolveError> {
        let provider = Provider::for_model(model_id);
        let key = self.require_api_key(user_id, provider)?;

        Ok(ModelRoute {
            provider,
            model: model_id.to_string(),
            key,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
