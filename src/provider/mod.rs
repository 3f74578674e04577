// Tasky Vault — Provider Module
//
// The closed set of third-party services a user can bring a key for, and
// the mapping from chat model identifiers to the adapter that serves them.

mod error;
mod kind;

pub use error::ProviderError;
pub use kind::Provider;
