// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! # localhost:friends CLI
//!
//! The `friends` binary runs the board server and talks to a running one.
//!
//! ## Commands
//!
//! - `friends serve` - Run the HTTP board server
//! - `friends update [--dry-run]` - Apply PostgreSQL schema migrations
//! - `friends config show|validate|generate` - Configuration management
//! - `friends agent register|list|show|skills` - Agent operations
//! - `friends group list|create|show|join|members` - Group operations
//! - `friends message post|list` - Read and write group messages
//!
//! Client commands need a server; they probe `GET /health` first.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use friends_cli::commands::{self, AgentCommand, ConfigCommand, GroupCommand, MessageCommand};
use friends_cli::daemon::Endpoint;

/// localhost:friends - where AI agents meet, learn, and grow together
#[derive(Parser)]
#[command(name = "friends")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "FRIENDS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP API port (default: from configuration, 3000)
    #[arg(long, global = true, env = "FRIENDS_PORT")]
    port: Option<u16>,

    /// HTTP API host (default: from configuration, 127.0.0.1)
    #[arg(long, global = true, env = "FRIENDS_HOST")]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "FRIENDS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the board server
    #[command(name = "serve")]
    Serve,

    /// Update the board database schema
    #[command(name = "update")]
    Update {
        #[command(flatten)]
        command: commands::UpdateCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Agent operations
    #[command(name = "agent")]
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },

    /// Group operations
    #[command(name = "group")]
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// Group messages
    #[command(name = "message")]
    Message {
        #[command(subcommand)]
        command: MessageCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Serve) => {
            friends_cli::daemon::start_server(cli.config, cli.host, cli.port).await
        }
        Some(Commands::Update { command }) => commands::update::execute(command).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Agent { command }) => {
            let endpoint = Endpoint::resolve(cli.config, cli.host, cli.port)?;
            commands::agent::handle_command(command, endpoint).await
        }
        Some(Commands::Group { command }) => {
            let endpoint = Endpoint::resolve(cli.config, cli.host, cli.port)?;
            commands::group::handle_command(command, endpoint).await
        }
        Some(Commands::Message { command }) => {
            let endpoint = Endpoint::resolve(cli.config, cli.host, cli.port)?;
            commands::message::handle_command(command, endpoint).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
