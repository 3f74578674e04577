// Tasky Vault — Vault Module
//
// Encryption at rest for user-supplied provider API keys. One process-wide
// master key (from the deployment environment) drives an AES-256-GCM vault;
// plaintext keys exist only transiently in zeroized memory at point of use.

mod cipher;
mod error;
mod master_key;

pub use cipher::{CredentialVault, EncryptedKey, IV_LEN, TAG_LEN};
pub use error::VaultError;
pub use master_key::{MasterKey, MASTER_KEY_LEN, MIN_PASSPHRASE_LEN};
