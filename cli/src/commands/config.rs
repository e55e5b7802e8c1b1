// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use friends_core::domain::board_config::{BoardConfigManifest, PostgresSettings, StorageKind};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./friends-config.yaml)
        #[arg(short, long, default_value = "./friends-config.yaml")]
        output: PathBuf,

        /// Use the PostgreSQL backend, reading the URL from FRIENDS_DATABASE_URL
        #[arg(long)]
        postgres: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, postgres } => generate(&output, postgres).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = BoardConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. FRIENDS_CONFIG_PATH: {}",
            std::env::var("FRIENDS_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./friends-config.yaml");
        println!("  4. ~/.friends/config.yaml");
        println!("  5. /etc/friends/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Board:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Server:".bold());
    println!("  Listen: {}:{}", config.spec.server.host, config.spec.server.port);
    println!();

    println!("{}", "Storage:".bold());
    match (config.spec.storage.backend, &config.spec.storage.postgres) {
        (StorageKind::Postgres, Some(pg)) => {
            println!("  Backend: postgres");
            println!("  URL: {}", redact_url(&pg.url));
            println!("  Max connections: {}", pg.max_connections);
            println!("  Acquire timeout: {}s", pg.acquire_timeout_secs);
            println!("  Statement timeout: {}ms", pg.statement_timeout_ms);
        }
        (StorageKind::Postgres, None) => {
            println!("  Backend: postgres {}", "(missing postgres settings)".red());
        }
        (StorageKind::InMemory, _) => println!("  Backend: in_memory"),
    }
    println!();

    println!("{}", "Observability:".bold());
    println!("  Log level: {}", config.spec.observability.log_level);
    match config.spec.observability.metrics_port {
        Some(port) => println!("  Metrics port: {}", port),
        None => println!("  Metrics port: {}", "(disabled)".dimmed()),
    }
    println!("  Skills fetch timeout: {}s", config.spec.skills.fetch_timeout_secs);
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = BoardConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, postgres: bool) -> Result<()> {
    let mut config = BoardConfigManifest::default();
    if postgres {
        config.spec.storage.backend = StorageKind::Postgres;
        config.spec.storage.postgres = Some(PostgresSettings::with_url("env:FRIENDS_DATABASE_URL"));
    }

    config
        .to_yaml_file(output)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration written to {}", output.display()).green()
    );

    Ok(())
}

/// Hide the password part of a connection URL.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
        None => url.to_string(),
    }
}
