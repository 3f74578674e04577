// Tasky Vault — Provider Enumeration
//
// Chat requests name a model, not a provider. `Provider::for_model` picks the
// adapter by model family; anything unrecognised goes to OpenRouter, which
// serves `vendor/model` identifiers for every other vendor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Google,
    Anthropic,
    OpenRouter,
    /// Web search only; never selected for a chat model.
    Tavily,
}

/// Model-id prefixes served by first-party adapters, checked in order.
const MODEL_PREFIXES: &[(&str, Provider)] = &[
    ("gpt-", Provider::OpenAi),
    ("chatgpt-", Provider::OpenAi),
    ("o1", Provider::OpenAi),
    ("o3", Provider::OpenAi),
    ("o4", Provider::OpenAi),
    ("gemini-", Provider::Google),
    ("claude-", Provider::Anthropic),
];

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::OpenAi,
        Provider::Google,
        Provider::Anthropic,
        Provider::OpenRouter,
        Provider::Tavily,
    ];

    /// The adapter used when a model id matches no first-party family.
    pub const DEFAULT_CHAT: Provider = Provider::OpenRouter;

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Google => "google",
            Provider::Anthropic => "anthropic",
            Provider::OpenRouter => "openrouter",
            Provider::Tavily => "tavily",
        }
    }

    /// Environment variable holding the shared house key for this provider.
    pub fn fallback_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Google => "GOOGLE_GENERATIVE_AI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Tavily => "TAVILY_API_KEY",
        }
    }

    /// Whether this provider serves chat completions.
    pub fn is_chat(&self) -> bool {
        !matches!(self, Provider::Tavily)
    }

    /// Pick the adapter for a chat model identifier.
    pub fn for_model(model_id: &str) -> Provider {
        let model = model_id.trim().to_ascii_lowercase();

        // A vendor prefix always routes through OpenRouter, even "openai/gpt-4o".
        if model.contains('/') {
            return Self::DEFAULT_CHAT;
        }

        MODEL_PREFIXES
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
            .map(|(_, provider)| *provider)
            .unwrap_or(Self::DEFAULT_CHAT)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "google" => Ok(Provider::Google),
            "anthropic" => Ok(Provider::Anthropic),
            "openrouter" => Ok(Provider::OpenRouter),
            "tavily" => Ok(Provider::Tavily),
            _ => Err(ProviderError::Unknown(s.to_string())),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
