// Tasky Vault — Process Master Key
//
// The single 256-bit secret under which every stored API key is encrypted.
// It is supplied by the deployment environment as either:
//   1. 64 hex characters — used directly as the AES-256 key, or
//   2. a passphrase of at least 16 characters — stretched with Argon2id
//      using a deterministic salt, so every process derives the same key.
//
// The key bytes live in `Zeroizing` memory and are redacted from Debug output.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::config::ConfigError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Length of the master key in bytes (AES-256).
pub const MASTER_KEY_LEN: usize = 32;

/// Shortest passphrase accepted for Argon2id stretching.
pub const MIN_PASSPHRASE_LEN: usize = 16;

/// Salt inputs for passphrase stretching. Changing these changes every
/// derived key and makes existing ciphertext unreadable.
const KDF_CONTEXT: &str = "ai-tasky-credential-vault";
const KDF_LABEL: &str = "encryption-key";

// Argon2id parameters: m=65536 (64 MiB), t=3, p=4
const ARGON2_M_COST: u32 = 65536;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

// ─── Master Key ──────────────────────────────────────────────────────────────

pub struct MasterKey {
    bytes: Zeroizing<[u8; MASTER_KEY_LEN]>,
}

impl MasterKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; MASTER_KEY_LEN]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Generate a fresh random master key.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; MASTER_KEY_LEN]);
        rand::rng().fill_bytes(&mut bytes[..]);
        Self { bytes }
    }

    /// Parse the value of the encryption-key environment variable.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(ConfigError::MissingEncryptionKey);
        }

        if value.len() == MASTER_KEY_LEN * 2 && value.bytes().all(|b| b.is_ascii_hexdigit()) {
            let mut bytes = Zeroizing::new([0u8; MASTER_KEY_LEN]);
            hex::decode_to_slice(value, &mut bytes[..]).map_err(|e| {
                ConfigError::InvalidValue {
                    key: crate::config::ENCRYPTION_KEY_VAR.to_string(),
                    message: format!("invalid hex: {}", e),
                }
            })?;
            tracing::debug!("Using raw 256-bit encryption key");
            return Ok(Self { bytes });
        }

        if value.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(ConfigError::WeakEncryptionKey(MIN_PASSPHRASE_LEN));
        }

        tracing::debug!("Deriving encryption key from passphrase with Argon2id");
        Self::derive_from_passphrase(value.as_bytes())
    }

    /// Stretch a passphrase into a 256-bit key with Argon2id.
    fn derive_from_passphrase(passphrase: &[u8]) -> Result<Self, ConfigError> {
        let salt = Self::build_salt();

        let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(MASTER_KEY_LEN))
            .map_err(|e| ConfigError::KeyDerivation(format!("invalid Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut bytes = Zeroizing::new([0u8; MASTER_KEY_LEN]);
        argon2
            .hash_password_into(passphrase, &salt, &mut bytes[..])
            .map_err(|e| ConfigError::KeyDerivation(format!("Argon2id hash failed: {}", e)))?;

        Ok(Self { bytes })
    }

    /// Salt = SHA-256(context || "::" || label)
    fn build_salt() -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(KDF_CONTEXT.as_bytes());
        hasher.update(b"::");
        hasher.update(KDF_LABEL.as_bytes());
        hasher.finalize().to_vec()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Render the key as hex, for handing to an operator exactly once.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.bytes[..]))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const HEX_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_hex_key_is_used_verbatim() {
        let key = MasterKey::parse(HEX_KEY).unwrap();
        assert_eq!(key.as_bytes().len(), MASTER_KEY_LEN);
        assert_eq!(key.as_bytes()[0], 0x01);
        assert_eq!(key.as_bytes()[31], 0xef);
        assert_eq!(key.to_hex().as_str(), HEX_KEY);
    }

    #[test]
    fn test_uppercase_hex_and_whitespace_accepted() {
        let padded = format!("  {}\n", HEX_KEY.to_uppercase());
        let key = MasterKey::parse(&padded).unwrap();
        assert_eq!(key.to_hex().as_str(), HEX_KEY);
    }

    #[test]
    fn test_empty_key_is_missing() {
        assert!(matches!(
            MasterKey::parse("   "),
            Err(ConfigError::MissingEncryptionKey)
        ));
    }

    #[test]
    fn test_short_passphrase_rejected() {
        assert!(matches!(
            MasterKey::parse("hunter2"),
            Err(ConfigError::WeakEncryptionKey(MIN_PASSPHRASE_LEN))
        ));
    }

    #[test]
    fn test_passphrase_derivation_is_deterministic() {
        let a = MasterKey::parse("correct horse battery staple").unwrap();
        let b = MasterKey::parse("correct horse battery staple").unwrap();
        let c = MasterKey::parse("incorrect horse battery staple").unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), c.as_bytes());
        assert_eq!(a.as_bytes().len(), MASTER_KEY_LEN);
    }

    #[test]
    fn test_generated_keys_differ_and_round_trip_through_hex() {
        let a = MasterKey::generate();
        let b = MasterKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());

        let reparsed = MasterKey::parse(&a.to_hex()).unwrap();
        assert_eq!(reparsed.as_bytes(), a.as_bytes());
    }

    #[test]
    fn test_debug_redacts_key_bytes() {
        let key = MasterKey::parse(HEX_KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("0123456789abcdef"));
    }
}
