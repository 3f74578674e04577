// Tasky Vault — Library root
//
// Re-exports the vault, provider, resolver, store, config, and CLI modules.

pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod store;
pub mod vault;

pub use error::{Result, TaskyError};
