// Tasky Vault — Configuration
//
// All environment-driven settings are read exactly once, at startup, into a
// `Config` that is passed down explicitly. Nothing below this module touches
// the process environment.

mod error;
mod fallback;

use std::path::PathBuf;

pub use error::ConfigError;
pub use fallback::FallbackKeySet;

use crate::provider::Provider;
use crate::vault::MasterKey;

/// Process-wide encryption key (hex or passphrase).
pub const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";

/// Comma-separated providers whose house key must be present at startup.
pub const REQUIRED_FALLBACKS_VAR: &str = "TASKY_REQUIRED_FALLBACKS";

/// Override for the credential database location.
pub const DB_PATH_VAR: &str = "TASKY_DB_PATH";

#[derive(Debug)]
pub struct Config {
    pub master_key: MasterKey,
    pub fallback_keys: FallbackKeySet,
    pub required_fallbacks: Vec<Provider>,
    pub database_path: PathBuf,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(optional_env)
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let master_key = match lookup(ENCRYPTION_KEY_VAR) {
            Some(value) => MasterKey::parse(&value)?,
            None => return Err(ConfigError::MissingEncryptionKey),
        };

        let fallback_keys = FallbackKeySet::from_lookup(&lookup);

        let required_fallbacks = match lookup(REQUIRED_FALLBACKS_VAR) {
            Some(list) => parse_provider_list(&list)?,
            None => Vec::new(),
        };

        for provider in &required_fallbacks {
            if !fallback_keys.contains(*provider) {
                return Err(ConfigError::MissingFallbackKey {
                    provider: *provider,
                    var: provider.fallback_env_var(),
                });
            }
        }

        let database_path = lookup(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        tracing::debug!(
            fallback_providers = ?fallback_keys.providers().collect::<Vec<_>>(),
            database = %database_path.display(),
            "Configuration loaded"
        );

        Ok(Self {
            master_key,
            fallback_keys,
            required_fallbacks,
            database_path,
        })
    }
}

/// Default directory for Tasky data files.
pub fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("ai-tasky")
}

fn default_db_path() -> PathBuf {
    data_dir().join("credentials.db")
}

fn parse_provider_list(list: &str) -> Result<Vec<Provider>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            name.parse::<Provider>().map_err(|e| ConfigError::InvalidValue {
                key: REQUIRED_FALLBACKS_VAR.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Load only the house keys from the process environment. Commands that
/// never touch stored credentials use this instead of `Config::from_env`.
pub fn fallback_keys_from_env() -> FallbackKeySet {
    let _ = dotenvy::dotenv();
    FallbackKeySet::from_lookup(optional_env)
}

/// Read a variable, treating empty and non-unicode values as unset.
fn optional_env(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(val) if val.trim().is_empty() => None,
        Ok(val) => Some(val),
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => {
            tracing::warn!(key = %key, "Ignoring non-unicode environment variable");
            None
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const HEX_KEY: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_lookup(lookup_from(&[(ENCRYPTION_KEY_VAR, HEX_KEY)])).unwrap();
        assert_eq!(config.master_key.to_hex().as_str(), HEX_KEY);
        assert!(config.fallback_keys.is_empty());
        assert!(config.required_fallbacks.is_empty());
        assert!(config.database_path.ends_with("credentials.db"));
    }

    #[test]
    fn test_missing_encryption_key_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "env-openai-key")]));
        assert!(matches!(result, Err(ConfigError::MissingEncryptionKey)));
    }

    #[test]
    fn test_weak_encryption_key_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[(ENCRYPTION_KEY_VAR, "short")]));
        assert!(matches!(result, Err(ConfigError::WeakEncryptionKey(_))));
    }

    #[test]
    fn test_fallback_keys_and_db_path() {
        let config = Config::from_lookup(lookup_from(&[
            (ENCRYPTION_KEY_VAR, HEX_KEY),
            ("OPENAI_API_KEY", "env-openai-key"),
            (DB_PATH_VAR, "/tmp/tasky-test.db"),
        ]))
        .unwrap();

        assert_eq!(config.fallback_keys.get(Provider::OpenAi), Some("env-openai-key"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/tasky-test.db"));
    }

    #[test]
    fn test_required_fallback_present() {
        let config = Config::from_lookup(lookup_from(&[
            (ENCRYPTION_KEY_VAR, HEX_KEY),
            (REQUIRED_FALLBACKS_VAR, "openai, tavily"),
            ("OPENAI_API_KEY", "env-openai-key"),
            ("TAVILY_API_KEY", "tvly-env"),
        ]))
        .unwrap();

        assert_eq!(config.required_fallbacks, vec![Provider::OpenAi, Provider::Tavily]);
    }

    #[test]
    fn test_required_fallback_missing_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[
            (ENCRYPTION_KEY_VAR, HEX_KEY),
            (REQUIRED_FALLBACKS_VAR, "openai,anthropic"),
            ("OPENAI_API_KEY", "env-openai-key"),
        ]));

        match result {
            Err(ConfigError::MissingFallbackKey { provider, var }) => {
                assert_eq!(provider, Provider::Anthropic);
                assert_eq!(var, "ANTHROPIC_API_KEY");
            }
            other => panic!("Expected MissingFallbackKey, got {:?}", other),
        }
    }

    #[test]
    fn test_required_fallback_unknown_provider() {
        let result = Config::from_lookup(lookup_from(&[
            (ENCRYPTION_KEY_VAR, HEX_KEY),
            (REQUIRED_FALLBACKS_VAR, "openai,unknown"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_debug_never_shows_secrets() {
        let config = Config::from_lookup(lookup_from(&[
            (ENCRYPTION_KEY_VAR, HEX_KEY),
            ("ANTHROPIC_API_KEY", "sk-ant-house"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains(HEX_KEY));
        assert!(!debug.contains("sk-ant-house"));
    }
}
