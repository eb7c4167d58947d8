// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arpent - back end tooling for a land-surveying firm's website.
//!
//! This is the binary entry point: an assistant chat REPL, the contact
//! message codec, cached team lookups and a config checker.

mod chat;
mod contact;
mod team;

use std::path::PathBuf;

use arpent_config::ArpentConfig;
use arpent_core::ArpentError;
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Arpent - back end tooling for a land-surveying firm's website.
#[derive(Parser, Debug)]
#[command(name = "arpent", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the site assistant.
    Chat,
    /// Encode or decode contact form messages.
    Contact {
        #[command(subcommand)]
        action: contact::ContactCommand,
    },
    /// Look up team members through the cached directory.
    Team {
        #[command(subcommand)]
        action: team::TeamCommand,
    },
    /// Manage Arpent configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration, then print a summary.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            arpent_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.general.log_level);

    let result = match cli.command {
        Commands::Chat => chat::run_chat(&config).await,
        Commands::Contact { action } => contact::run_contact(action),
        Commands::Team { action } => team::run_team(&config, action).await,
        Commands::Config {
            action: ConfigCommand::Check,
        } => {
            print_config_summary(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<ArpentConfig, Vec<arpent_config::ConfigError>> {
    match path {
        Some(path) => arpent_config::load_and_validate_path(path),
        None => arpent_config::load_and_validate(),
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("arpent={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_config_summary(config: &ArpentConfig) {
    println!("{}", "config ok".green().bold());
    println!("  log level       {}", config.general.log_level);
    println!(
        "  assistant       {}",
        config.assistant.endpoint.as_deref().unwrap_or("(disabled)")
    );
    println!(
        "  directory       {}",
        config.directory.base_url.as_deref().unwrap_or("(disabled)")
    );
    println!("  profile table   {}", config.directory.table);
    println!("  cache ttl       {}s", config.directory.cache_ttl_secs);
}

/// Error for a command whose config section is incomplete.
pub(crate) fn missing_section(section: &str, e: ArpentError) -> ArpentError {
    ArpentError::Config(format!("[{section}] section is incomplete ({e})"))
}
