//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Resolve the file closure a container entrypoint actually needs
#[derive(Parser)]
#[command(name = "paredown", version, propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve the entrypoint dependency closure of the first running container
    Resolve,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command. Running with no subcommand resolves the first
    /// running container, same as `paredown resolve`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli { no_color, quiet, json, command } = self;
        match command {
            Some(Command::Version) => {
                commands::version::run(json);
                Ok(())
            }
            Some(Command::Resolve) | None => {
                let ctx = OutputContext::new(no_color, quiet);
                commands::resolve::run(&ctx, json).await
            }
        }
    }
}
