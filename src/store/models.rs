// Tasky Vault — Stored credential models
//
// A `StoredCredential` holds the vault output for one (user, provider) pair.
// Its Debug output omits the encrypted fields, and the summary view used for
// listings has no encrypted fields at all.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider::Provider;
use crate::vault::EncryptedKey;

/// One encrypted API key, as persisted.
#[derive(Clone)]
pub struct StoredCredential {
    pub id: Uuid,
    pub user_id: String,
    pub provider: Provider,
    pub encrypted: EncryptedKey,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Metadata-only view of this record.
    pub fn summary(&self) -> CredentialSummary {
        CredentialSummary {
            id: self.id,
            user_id: self.user_id.clone(),
            provider: self.provider,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("provider", &self.provider)
            .field("encrypted", &"[OMITTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl fmt::Display for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} key for user {}", self.id, self.provider, self.user_id)
    }
}

/// A lightweight view of a stored credential, used for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSummary {
    pub id: Uuid,
    pub user_id: String,
    pub provider: Provider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for CredentialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (updated {})",
            self.id,
            self.provider,
            self.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
