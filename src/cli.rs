use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Repack - lay a legacy app build out as a standard package
#[derive(Parser, Debug)]
#[command(name = "repack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to repack.toml
    #[arg(short, long, default_value = "repack.toml", global = true)]
    pub config: PathBuf,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the package once
    Build {
        /// Output directory (overrides config and REPACK_OUTPUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// App source directory handed over by a previous stage
        #[arg(long)]
        app: Option<PathBuf>,
    },

    /// Rebuild whenever the app or its dependencies change
    Watch {
        /// Output directory (overrides config and REPACK_OUTPUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
