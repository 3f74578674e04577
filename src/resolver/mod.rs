// Tasky Vault — Resolver Module
//
// "Bring your own key, otherwise use the house key, otherwise decline."

mod error;
mod key;
mod provider_resolver;

pub use error::ResolveError;
pub use key::{mask_key, KeySource, ModelRoute, ResolvedKey};
pub use provider_resolver::ProviderResolver;
