// Tasky Vault — Vault error types
//
// Messages never carry key material, ciphertext, or IVs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    /// The (ciphertext, iv, auth_tag) triple did not authenticate under the
    /// process key. Retrying with the same inputs cannot succeed.
    #[error("Stored credential failed integrity check — it was altered, corrupted, or encrypted under a different key")]
    Integrity,

    #[error("Encryption error: {0}")]
    Encryption(String),
}
