// Tasky Vault — CLI Module
//
// Operator command-line interface using clap derive macros.
// Subcommands: generate-key, set-key, delete-key, list, resolve, route, providers.

mod commands;

use std::fmt;

use clap::{Parser, Subcommand};

use crate::provider::Provider;

pub use commands::{execute, execute_with_config};

/// Tasky Vault — encrypted per-user AI provider keys with house-key fallback.
#[derive(Parser, Debug)]
#[command(name = "tasky-vault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a fresh 256-bit encryption key for ENCRYPTION_KEY.
    GenerateKey,

    /// Store (or replace) a user's API key for a provider.
    SetKey {
        /// The owning user's ID.
        #[arg(long)]
        user: String,

        /// openai, google, anthropic, openrouter, or tavily.
        #[arg(long)]
        provider: Provider,

        /// The API key. Prefer TASKY_SECRET to keep it out of shell history.
        #[arg(long, env = "TASKY_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Delete a user's API key for a provider.
    DeleteKey {
        #[arg(long)]
        user: String,

        #[arg(long)]
        provider: Provider,
    },

    /// List a user's stored keys (metadata only, no secrets).
    List {
        #[arg(long)]
        user: String,

        /// Print JSON instead of a table.
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show which key a request would use (masked).
    Resolve {
        #[arg(long)]
        user: String,

        /// Provider name; names outside the known set have no key.
        #[arg(long)]
        provider: String,

        /// Fail if no key is available.
        #[arg(long, default_value = "false")]
        require: bool,
    },

    /// Show which provider and key a chat model would use (masked).
    Route {
        #[arg(long)]
        user: String,

        /// Model identifier, e.g. "gpt-4o" or "meta-llama/llama-3.1-70b".
        #[arg(long)]
        model: String,
    },

    /// List providers and whether a house key is configured.
    Providers,
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commands::GenerateKey => f.write_str("GenerateKey"),
            Commands::SetKey { user, provider, .. } => f
                .debug_struct("SetKey")
                .field("user", user)
                .field("provider", provider)
                .field("secret", &"[REDACTED]")
                .finish(),
            Commands::DeleteKey { user, provider } => f
                .debug_struct("DeleteKey")
                .field("user", user)
                .field("provider", provider)
                .finish(),
            Commands::List { user, json } => f
                .debug_struct("List")
                .field("user", user)
                .field("json", json)
                .finish(),
            Commands::Resolve {
                user,
                provider,
                require,
            } => f
                .debug_struct("Resolve")
                .field("user", user)
                .field("provider", provider)
                .field("require", require)
                .finish(),
            Commands::Route { user, model } => f
                .debug_struct("Route")
                .field("user", user)
                .field("model", model)
                .finish(),
            Commands::Providers => f.write_str("Providers"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
