//! Command-line interface for zyro.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zyro - grid battle narrated by a language model
#[derive(Parser, Debug)]
#[command(name = "zyro")]
#[command(about = "Grid battle turn resolver with LLM narration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP turn resolution server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Path to narrator configuration (TOML). Defaults apply if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play a whole match in the terminal
    Play {
        /// Path to narrator configuration (TOML). Defaults apply if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for cell picks and fallback narration
        #[arg(short, long)]
        seed: Option<u64>,

        /// Built-in world to play in (defaults to the world of the day)
        #[arg(short, long)]
        world: Option<String>,
    },
}
