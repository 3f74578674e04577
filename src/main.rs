// Tasky Vault — Application Entry Point
//
// Parses CLI arguments, initializes structured logging (with a filter that
// never emits key material), and dispatches to the command handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tasky_vault::cli::{execute, Cli};

fn main() {
    // RUST_LOG=tasky_vault=debug for verbose output. No level ever includes
    // plaintext keys, ciphertext, or IVs.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tasky_vault=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
