// Tasky Vault — Credential Store Repository
//
// Persistence for `StoredCredential` rows keyed by (user, provider). A
// missing row is `Ok(None)`, never an error. Replacing a key rewrites
// ciphertext, iv and auth tag in a single statement.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::db::Database;
use super::models::{CredentialSummary, StoredCredential};
use super::StoreError;
use crate::provider::Provider;
use crate::vault::{CredentialVault, EncryptedKey};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over stored-credential persistence.
pub trait CredentialStore {
    /// Fetch the encrypted key for a (user, provider) pair.
    fn get(&self, user_id: &str, provider: Provider) -> Result<Option<StoredCredential>, StoreError>;

    /// Insert or replace the encrypted key for a (user, provider) pair.
    /// Returns the row id, which is stable across replacements.
    fn upsert(
        &self,
        user_id: &str,
        provider: Provider,
        encrypted: &EncryptedKey,
    ) -> Result<Uuid, StoreError>;

    /// Remove a user's key for a provider. Returns true if it existed.
    fn delete(&self, user_id: &str, provider: Provider) -> Result<bool, StoreError>;

    /// List a user's stored keys (metadata only).
    fn list_for_user(&self, user_id: &str) -> Result<Vec<CredentialSummary>, StoreError>;
}

/// Encrypt a plaintext key and store it for the user, replacing any
/// previous key for the same provider.
pub fn store_api_key<S>(
    store: &S,
    vault: &CredentialVault,
    user_id: &str,
    provider: Provider,
    plaintext: &str,
) -> crate::Result<Uuid>
where
    S: CredentialStore + ?Sized,
{
    let encrypted = vault.encrypt(plaintext)?;
    let id = store.upsert(user_id, provider, &encrypted)?;

    tracing::info!(
        credential_id = %id,
        user_id = %user_id,
        provider = %provider,
        "API key stored"
    );

    Ok(id)
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteCredentialStore<'a> {
    db: &'a Database,
}

impl<'a> SqliteCredentialStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Parse a full credential row.
    fn row_to_credential(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredCredential> {
        let id_str: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let provider_str: String = row.get(2)?;
        let ciphertext: String = row.get(3)?;
        let iv: String = row.get(4)?;
        let auth_tag: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        Ok(StoredCredential {
            id: parse_uuid(0, &id_str)?,
            user_id,
            provider: parse_provider(2, &provider_str)?,
            encrypted: EncryptedKey {
                ciphertext,
                iv,
                auth_tag,
            },
            created_at: parse_timestamp(6, &created_at_str)?,
            updated_at: parse_timestamp(7, &updated_at_str)?,
        })
    }

    /// Parse a summary row (no encrypted fields).
    fn row_to_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<CredentialSummary> {
        let id_str: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let provider_str: String = row.get(2)?;
        let created_at_str: String = row.get(3)?;
        let updated_at_str: String = row.get(4)?;

        Ok(CredentialSummary {
            id: parse_uuid(0, &id_str)?,
            user_id,
            provider: parse_provider(2, &provider_str)?,
            created_at: parse_timestamp(3, &created_at_str)?,
            updated_at: parse_timestamp(4, &updated_at_str)?,
        })
    }
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_uuid(column: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| conversion_error(column, e))
}

fn parse_provider(column: usize, value: &str) -> rusqlite::Result<Provider> {
    value.parse::<Provider>().map_err(|e| conversion_error(column, e))
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

impl<'a> CredentialStore for SqliteCredentialStore<'a> {
    fn get(&self, user_id: &str, provider: Provider) -> Result<Option<StoredCredential>, StoreError> {
        let cred = self
            .db
            .conn()
            .query_row(
                "SELECT id, user_id, provider, ciphertext, iv, auth_tag, created_at, updated_at
                 FROM stored_credentials WHERE user_id = ?1 AND provider = ?2",
                params![user_id, provider.as_str()],
                Self::row_to_credential,
            )
            .optional()?;

        Ok(cred)
    }

    fn upsert(
        &self,
        user_id: &str,
        provider: Provider,
        encrypted: &EncryptedKey,
    ) -> Result<Uuid, StoreError> {
        let now = Utc::now().to_rfc3339();

        let id_str: String = self.db.conn().query_row(
            "INSERT INTO stored_credentials
                (id, user_id, provider, ciphertext, iv, auth_tag, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(user_id, provider) DO UPDATE SET
                ciphertext = excluded.ciphertext,
                iv         = excluded.iv,
                auth_tag   = excluded.auth_tag,
                updated_at = excluded.updated_at
             RETURNING id",
            params![
                Uuid::new_v4().to_string(),
                user_id,
                provider.as_str(),
                encrypted.ciphertext,
                encrypted.iv,
                encrypted.auth_tag,
                now,
            ],
            |row| row.get(0),
        )?;

        let id = Uuid::parse_str(&id_str)
            .map_err(|e| StoreError::Corrupt(format!("invalid credential id '{}': {}", id_str, e)))?;

        tracing::debug!(
            credential_id = %id,
            user_id = %user_id,
            provider = %provider,
            "Credential row written"
        );

        Ok(id)
    }

    fn delete(&self, user_id: &str, provider: Provider) -> Result<bool, StoreError> {
        let affected = self.db.conn().execute(
            "DELETE FROM stored_credentials WHERE user_id = ?1 AND provider = ?2",
            params![user_id, provider.as_str()],
        )?;

        if affected > 0 {
            tracing::info!(user_id = %user_id, provider = %provider, "API key deleted");
        }

        Ok(affected > 0)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<CredentialSummary>, StoreError> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, user_id, provider, created_at, updated_at
             FROM stored_credentials WHERE user_id = ?1 ORDER BY provider ASC",
        )?;

        let rows = stmt.query_map(params![user_id], Self::row_to_summary)?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }

        Ok(summaries)
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────

/// A mock store holding credentials in memory.
/// Used by resolver tests so they don't need a database.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCredentialStore {
        rows: Mutex<HashMap<(String, Provider), StoredCredential>>,
        fail: bool,
        gets: AtomicUsize,
    }

    impl MockCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// A store whose every call fails, as if the database were down.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        /// Overwrite a row's encrypted fields directly, bypassing the vault.
        pub fn tamper(&self, user_id: &str, provider: Provider, f: impl FnOnce(&mut EncryptedKey)) {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.get_mut(&(user_id.to_string(), provider)) {
                f(&mut row.encrypted);
            }
        }

        /// Number of `get` calls served.
        pub fn get_count(&self) -> usize {
            self.gets.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.fail {
                Err(StoreError::Other("mock store unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl CredentialStore for MockCredentialStore {
        fn get(
            &self,
            user_id: &str,
            provider: Provider,
        ) -> Result<Option<StoredCredential>, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.get(&(user_id.to_string(), provider)).cloned())
        }

        fn upsert(
            &self,
            user_id: &str,
            provider: Provider,
            encrypted: &EncryptedKey,
        ) -> Result<Uuid, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let now = Utc::now();
            let row = rows
                .entry((user_id.to_string(), provider))
                .or_insert_with(|| StoredCredential {
                    id: Uuid::new_v4(),
                    user_id: user_id.to_string(),
                    provider,
                    encrypted: encrypted.clone(),
                    created_at: now,
                    updated_at: now,
                });
            row.encrypted = encrypted.clone();
            row.updated_at = now;
            Ok(row.id)
        }

        fn delete(&self, user_id: &str, provider: Provider) -> Result<bool, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.remove(&(user_id.to_string(), provider)).is_some())
        }

        fn list_for_user(&self, user_id: &str) -> Result<Vec<CredentialSummary>, StoreError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let mut summaries: Vec<_> = rows
                .values()
                .filter(|row| row.user_id == user_id)
                .map(StoredCredential::summary)
                .collect();
            summaries.sort_by_key(|s| s.provider.as_str());
            Ok(summaries)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
