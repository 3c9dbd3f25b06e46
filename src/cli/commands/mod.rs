//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "formreader")]
#[command(about = "Reads photographed inspection forms into the formularios table")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload server
    Serve {
        /// Address to bind: port, host, or host:port
        #[arg(short, long, env = "FORMREADER_BIND", default_value = "0.0.0.0:5000")]
        bind: String,
    },

    /// Send a local image to Document AI and print the fields it found
    Check {
        /// Image file to send
        #[arg(default_value = "teste.jpg")]
        file: PathBuf,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Check { file } => check::cmd_check(&settings, &file).await,
    }
}
