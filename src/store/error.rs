// Tasky Vault — Store error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt credential row: {0}")]
    Corrupt(String),

    #[error("{0}")]
    Other(String),
}
