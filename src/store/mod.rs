// Tasky Vault — Store Module
//
// Persistence for encrypted per-user API keys. Rows hold vault output only;
// encryption and decryption happen in the vault module.

mod db;
mod error;
mod models;
mod repository;

pub use db::Database;
pub use error::StoreError;
pub use models::{CredentialSummary, StoredCredential};
pub use repository::{store_api_key, CredentialStore, SqliteCredentialStore};

#[cfg(test)]
pub use repository::mock;
