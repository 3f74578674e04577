// Tasky Vault — Resolved keys
//
// A plaintext key on its way to an AI SDK adapter. Zeroized on drop; never
// shown in full by Debug or Display.

use std::fmt;

use zeroize::Zeroizing;

use crate::provider::Provider;

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// The user's own key, decrypted from the vault.
    Personal,
    /// The operator's house key from the environment.
    Fallback,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Personal => write!(f, "personal"),
            KeySource::Fallback => write!(f, "fallback"),
        }
    }
}

pub struct ResolvedKey {
    key: Zeroizing<String>,
    source: KeySource,
}

impl ResolvedKey {
    pub fn new(key: Zeroizing<String>, source: KeySource) -> Self {
        Self { key, source }
    }

    /// The plaintext key, for handing to the provider SDK.
    pub fn expose(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    /// First and last four characters, for display in settings and logs.
    pub fn masked(&self) -> String {
        mask_key(&self.key)
    }
}

impl fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("key", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Shortest key shown as `abcd…wxyz`; eight visible characters stay under
/// half of it.
const MIN_MASKABLE_LEN: usize = 20;

/// Mask a key as `abcd…wxyz`. Keys too short to mask safely become `****`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < MIN_MASKABLE_LEN {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// A chat model bound to the provider that serves it and the key to use.
#[derive(Debug)]
pub struct ModelRoute {
    pub provider: Provider,
    pub model: String,
    pub key: ResolvedKey,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_long_key() {
        assert_eq!(mask_key("sk-test-1234567890abcdef"), "sk-t…cdef");
    }

    #[test]
    fn test_mask_short_key() {
        assert_eq!(mask_key("sk-live-abc"), "****");
        assert_eq!(mask_key(""), "****");
    }

    #[test]
    fn test_mask_hides_mid_length_keys() {
        // 12 to 19 characters would leave half or more of the key visible.
        assert_eq!(mask_key("sk-live-abcd"), "****");
        assert_eq!(mask_key("sk-live-abcdefghijk"), "****");
        assert_eq!(mask_key("sk-live-abcdefghijkl"), "sk-l…ijkl");
    }

    #[test]
    fn test_mask_multibyte_key() {
        assert_eq!(mask_key("ключ-ключ-ключ-ключ-"), "ключ…люч-");
        assert_eq!(mask_key("ключ-ключ-ключ"), "****");
    }

    #[test]
    fn test_debug_redacts() {
        let key = ResolvedKey::new(Zeroizing::new("sk-secret-value-123".to_string()), KeySource::Personal);
        let debug = format!("{:?}", key);
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("Personal"));
        assert!(!debug.contains("sk-secret-value-123"));
        assert_eq!(key.expose(), "sk-secret-value-123");
    }
}
