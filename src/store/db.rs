// Tasky Vault — SQLite Database Management
//
// Opens the credential database and brings its schema up to date. Rows hold
// only vault output (ciphertext, iv, auth tag); no plaintext key ever
// reaches this layer.

use std::path::Path;

use rusqlite::Connection;

use super::StoreError;

/// Wrapper around the SQLite connection holding stored credentials.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Other(format!(
                        "failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;

        tracing::debug!(path = %path.display(), "Credential database opened");
        Ok(db)
    }

    /// Open an in-memory database (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run schema migrations to create or update tables.
    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS stored_credentials (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                provider        TEXT NOT NULL,
                ciphertext      TEXT NOT NULL,
                iv              TEXT NOT NULL,
                auth_tag        TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL,
                UNIQUE(user_id, provider)
            );

            CREATE INDEX IF NOT EXISTS idx_stored_credentials_user
                ON stored_credentials(user_id);
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
