// Tasky Vault — Provider error types

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown provider '{0}' — expected one of: openai, google, anthropic, openrouter, tavily")]
    Unknown(String),
}
