//! Repack CLI
//!
//! Usage: repack [--config repack.toml] <COMMAND>
//!
//! Commands:
//!   build   Build the package once
//!   watch   Rebuild whenever the app or its dependencies change

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { out, app } => {
            commands::build::cmd_build(&cli.config, out, app, cli.json)
        }
        Commands::Watch { out } => commands::watch::cmd_watch(&cli.config, out, cli.json),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
