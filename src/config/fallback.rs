// Tasky Vault — House Keys
//
// Operator-supplied API keys shared by every user who has not brought their
// own. Loaded once at startup and read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

use crate::provider::Provider;

#[derive(Clone, Default)]
pub struct FallbackKeySet {
    keys: BTreeMap<Provider, Zeroizing<String>>,
}

impl FallbackKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every provider's fallback variable through `lookup`.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut set = Self::new();
        for provider in Provider::ALL {
            if let Some(value) = lookup(provider.fallback_env_var()) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    set.keys.insert(provider, Zeroizing::new(trimmed.to_string()));
                }
            }
        }
        set
    }

    /// Builder used by tests and embedders that configure keys directly.
    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.keys.insert(provider, Zeroizing::new(key.into()));
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.keys.get(&provider).map(|k| k.as_str())
    }

    pub fn contains(&self, provider: Provider) -> bool {
        self.keys.contains_key(&provider)
    }

    /// Providers with a house key, in enumeration order.
    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.keys.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for FallbackKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.keys.keys().map(|p| (p.as_str(), "[REDACTED]")))
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_loads_known_variables() {
        let set = FallbackKeySet::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "env-openai-key"),
            ("TAVILY_API_KEY", "tvly-env"),
            ("UNRELATED", "ignored"),
        ]));

        assert_eq!(set.get(Provider::OpenAi), Some("env-openai-key"));
        assert_eq!(set.get(Provider::Tavily), Some("tvly-env"));
        assert_eq!(set.get(Provider::Anthropic), None);
        assert_eq!(
            set.providers().collect::<Vec<_>>(),
            vec![Provider::OpenAi, Provider::Tavily]
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let set = FallbackKeySet::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", ""),
            ("ANTHROPIC_API_KEY", "   "),
        ]));
        assert!(set.is_empty());
        assert!(!set.contains(Provider::OpenAi));
    }

    #[test]
    fn test_values_are_trimmed() {
        let set = FallbackKeySet::from_lookup(lookup_from(&[("GOOGLE_GENERATIVE_AI_API_KEY", " g-key\n")]));
        assert_eq!(set.get(Provider::Google), Some("g-key"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let set = FallbackKeySet::new().with_key(Provider::OpenRouter, "sk-or-secret");
        let debug = format!("{:?}", set);
        assert!(debug.contains("openrouter"));
        assert!(!debug.contains("sk-or-secret"));
    }
}
