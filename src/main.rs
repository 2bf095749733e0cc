//! Paredown — resolve the file closure a container entrypoint actually needs.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use paredown_cli::cli::Cli;

#[tokio::main]
async fn main() {
    // Structured logs go to stderr so `--json` output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
