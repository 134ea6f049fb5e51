//! askmysite cli definition and entrypoint.
mod commands;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use askmysite_core::{AskMySiteClient, FileStore, config::get_config, get_data_dir};
use clap::{Parser, Subcommand};

use crate::log::setup_logging;

/// askmysite - talk to an AskMySite chatbot from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Show the chatbot widget configuration.
    Config,
    /// Send a message to the chatbot.
    Chat {
        /// Message to send.
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Show the stored conversation.
    History,
    /// Show the current session token.
    Session,
    /// Clear the stored conversation.
    Clear {
        /// Also forget the session token.
        #[arg(long)]
        all: bool,
    },
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;
    let store_path = get_data_dir()
        .context("Failed to get data directory")?
        .join("store.json");
    let client = config
        .build_client(Arc::new(FileStore::new(store_path)))
        .context("Failed to create client")?;

    let mut stdout = std::io::stdout();
    dispatch(&cli.command, &client, &config, &mut stdout).await
}

async fn dispatch<W: Write>(
    command: &Commands,
    client: &AskMySiteClient,
    config: &askmysite_core::config::Config,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Config => commands::show_config(client, &config.widget, out).await,
        Commands::Chat { message } => commands::chat(client, &message.join(" "), out).await,
        Commands::History => commands::history(client, out),
        Commands::Session => commands::session(client, out),
        Commands::Clear { all } => commands::clear(client, *all, out),
    }
}
