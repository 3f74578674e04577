// Tasky Vault — Credential Vault
//
// Encrypts user-supplied API keys for storage and decrypts them at the point
// of use. AES-256-GCM with a fresh random 96-bit IV per call; the 16-byte tag
// is kept detached so the three parts can be stored in separate columns.
//
// Decryption is all-or-nothing: if the tag does not verify, the working
// buffer is wiped and only `VaultError::Integrity` is returned.

use std::fmt;

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{MasterKey, VaultError};

/// GCM IV length in bytes (96 bits).
pub const IV_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Output of one `encrypt` call. All three fields are hex-encoded and must
/// be stored and passed back together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedKey {
    pub ciphertext: String,
    pub iv: String,
    pub auth_tag: String,
}

impl fmt::Debug for EncryptedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedKey")
            .field("ciphertext", &format_args!("[{} hex chars]", self.ciphertext.len()))
            .field("iv", &"[OMITTED]")
            .field("auth_tag", &"[OMITTED]")
            .finish()
    }
}

pub struct CredentialVault {
    cipher: Aes256Gcm,
}

impl CredentialVault {
    pub fn new(master_key: &MasterKey) -> Result<Self, VaultError> {
        let cipher = Aes256Gcm::new_from_slice(master_key.as_bytes())
            .map_err(|e| VaultError::Encryption(format!("invalid master key length: {}", e)))?;
        Ok(Self { cipher })
    }

    /// Encrypt a plaintext API key under a fresh random IV.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedKey, VaultError> {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);

        let mut buffer = Zeroizing::new(plaintext.as_bytes().to_vec());
        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| VaultError::Encryption("AES-256-GCM encryption failed".to_string()))?;

        Ok(EncryptedKey {
            ciphertext: hex::encode(buffer.as_slice()),
            iv: hex::encode(iv),
            auth_tag: hex::encode(tag.as_slice()),
        })
    }

    /// Decrypt a triple produced by a single `encrypt` call.
    pub fn decrypt(
        &self,
        ciphertext: &str,
        iv: &str,
        auth_tag: &str,
    ) -> Result<Zeroizing<String>, VaultError> {
        let iv = decode_fixed::<IV_LEN>(iv)?;
        let tag = decode_fixed::<TAG_LEN>(auth_tag)?;
        let mut buffer = Zeroizing::new(hex::decode(ciphertext).map_err(|_| VaultError::Integrity)?);

        self.cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&iv),
                b"",
                &mut buffer,
                Tag::from_slice(&tag),
            )
            .map_err(|_| VaultError::Integrity)?;

        // Authenticated bytes always came from a `&str`, so this only fails
        // if the key itself was used to forge a non-UTF-8 payload.
        let plaintext = std::str::from_utf8(&buffer).map_err(|_| VaultError::Integrity)?;
        Ok(Zeroizing::new(plaintext.to_string()))
    }

    /// Convenience wrapper over `decrypt` for a stored triple.
    pub fn decrypt_key(&self, encrypted: &EncryptedKey) -> Result<Zeroizing<String>, VaultError> {
        self.decrypt(&encrypted.ciphertext, &encrypted.iv, &encrypted.auth_tag)
    }
}

impl fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault")
            .field("algorithm", &"AES-256-GCM")
            .finish()
    }
}

/// Decode a hex field that must be exactly `N` bytes. Any malformation is
/// reported as an integrity failure, same as a bad tag.
fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], VaultError> {
    let mut out = [0u8; N];
    hex::decode_to_slice(value, &mut out).map_err(|_| VaultError::Integrity)?;
    Ok(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
