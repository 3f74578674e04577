// Tasky Vault — CLI Command Handlers
//
// Each function handles one CLI subcommand. They coordinate between the
// config, vault, store and resolver modules. Plaintext keys are only ever
// printed masked; the one exception is `generate-key`, whose whole purpose
// is to hand the operator a new master key.

use std::io::Write;
use std::sync::Arc;

use crate::config::{self, Config, FallbackKeySet};
use crate::error::TaskyError;
use crate::provider::Provider;
use crate::resolver::ProviderResolver;
use crate::store::{store_api_key, CredentialStore, Database, SqliteCredentialStore};
use crate::vault::{CredentialVault, MasterKey};

use super::Commands;

/// Execute the parsed CLI command against the process environment.
pub fn execute(command: Commands) -> Result<(), TaskyError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::GenerateKey => return cmd_generate_key(&mut out),
        // Needs only the house keys, not the master key or the database.
        Commands::Providers => return cmd_providers(&config::fallback_keys_from_env(), &mut out),
        _ => {}
    }

    let config = Config::from_env()?;
    execute_with_config(command, &config, &mut out)
}

/// Execute a command with an already-loaded configuration.
pub fn execute_with_config<W: Write>(
    command: Commands,
    config: &Config,
    out: &mut W,
) -> Result<(), TaskyError> {
    match command {
        Commands::GenerateKey => cmd_generate_key(out),
        Commands::Providers => cmd_providers(&config.fallback_keys, out),
        command => {
            let db = Database::open(&config.database_path)?;
            let vault = Arc::new(CredentialVault::new(&config.master_key)?);
            let resolver = ProviderResolver::new(
                SqliteCredentialStore::new(&db),
                vault,
                Arc::new(config.fallback_keys.clone()),
            );
            dispatch(command, &resolver, out)
        }
    }
}

fn dispatch<S, W>(
    command: Commands,
    resolver: &ProviderResolver<S>,
    out: &mut W,
) -> Result<(), TaskyError>
where
    S: CredentialStore,
    W: Write,
{
    match command {
        Commands::SetKey {
            user,
            provider,
            secret,
        } => cmd_set_key(resolver, &user, provider, &secret, out),
        Commands::DeleteKey { user, provider } => cmd_delete_key(resolver, &user, provider, out),
        Commands::List { user, json } => cmd_list(resolver, &user, json, out),
        Commands::Resolve {
            user,
            provider,
            require,
        } => cmd_resolve(resolver, &user, &provider, require, out),
        Commands::Route { user, model } => cmd_route(resolver, &user, &model, out),
        Commands::GenerateKey | Commands::Providers => Err(TaskyError::Other(
            "command does not use the credential store".to_string(),
        )),
    }
}

// ─── Keys ────────────────────────────────────────────────────────────────────

fn cmd_generate_key<W: Write>(out: &mut W) -> Result<(), TaskyError> {
    let key = MasterKey::generate();
    writeln!(out, "{}", key.to_hex().as_str())?;
    Ok(())
}

fn cmd_set_key<S: CredentialStore, W: Write>(
    resolver: &ProviderResolver<S>,
    user: &str,
    provider: Provider,
    secret: &str,
    out: &mut W,
) -> Result<(), TaskyError> {
    let secret = secret.trim();
    if secret.is_empty() {
        return Err(TaskyError::Other("API key must not be empty".to_string()));
    }

    let id = store_api_key(resolver.store(), resolver.vault(), user, provider, secret)?;
    writeln!(out, "✓ {} key stored for user {}", provider, user)?;
    writeln!(out, "  ID: {}", id)?;
    Ok(())
}

fn cmd_delete_key<S: CredentialStore, W: Write>(
    resolver: &ProviderResolver<S>,
    user: &str,
    provider: Provider,
    out: &mut W,
) -> Result<(), TaskyError> {
    if resolver.store().delete(user, provider)? {
        writeln!(out, "✓ {} key deleted for user {}", provider, user)?;
    } else {
        writeln!(out, "No {} key stored for user {}", provider, user)?;
    }
    Ok(())
}

fn cmd_list<S: CredentialStore, W: Write>(
    resolver: &ProviderResolver<S>,
    user: &str,
    json: bool,
    out: &mut W,
) -> Result<(), TaskyError> {
    let summaries = resolver.store().list_for_user(user)?;

    if json {
        let rendered = serde_json::to_string_pretty(&summaries)
            .map_err(|e| TaskyError::Other(format!("failed to render JSON: {}", e)))?;
        writeln!(out, "{}", rendered)?;
        return Ok(());
    }

    if summaries.is_empty() {
        writeln!(out, "No keys stored for user {}.", user)?;
        return Ok(());
    }

    writeln!(out, "Stored keys for {} ({}):\n", user, summaries.len())?;
    for summary in &summaries {
        writeln!(
            out,
            "  {} │ {:10} │ updated {}",
            summary.id,
            summary.provider.as_str(),
            summary.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )?;
    }
    Ok(())
}

// ─── Resolution ──────────────────────────────────────────────────────────────

fn cmd_resolve<S: CredentialStore, W: Write>(
    resolver: &ProviderResolver<S>,
    user: &str,
    provider: &str,
    require: bool,
    out: &mut W,
) -> Result<(), TaskyError> {
    let resolved = if require {
        Some(resolver.require_api_key_by_name(user, provider)?)
    } else {
        resolver.resolve_api_key_by_name(user, provider)?
    };

    match resolved {
        Some(key) => writeln!(out, "{}: {} key {}", provider, key.source(), key.masked())?,
        None => writeln!(out, "{}: no key available", provider)?,
    }
    Ok(())
}

fn cmd_route<S: CredentialStore, W: Write>(
    resolver: &ProviderResolver<S>,
    user: &str,
    model: &str,
    out: &mut W,
) -> Result<(), TaskyError> {
    let route = resolver.resolve_for_model(user, model)?;
    writeln!(
        out,
        "{} → {} ({} key {})",
        route.model,
        route.provider,
        route.key.source(),
        route.key.masked()
    )?;
    Ok(())
}

fn cmd_providers<W: Write>(fallback_keys: &FallbackKeySet, out: &mut W) -> Result<(), TaskyError> {
    for provider in Provider::ALL {
        let status = if fallback_keys.contains(provider) {
            "house key configured"
        } else {
            "bring your own key"
        };
        writeln!(
            out,
            "  {:10} │ {:28} │ {}",
            provider.as_str(),
            provider.fallback_env_var(),
            status
        )?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
