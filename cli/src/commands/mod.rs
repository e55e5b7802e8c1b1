// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the friends CLI

pub mod agent;
pub mod config;
pub mod group;
pub mod message;
pub mod update;

pub use self::agent::AgentCommand;
pub use self::config::ConfigCommand;
pub use self::group::GroupCommand;
pub use self::message::MessageCommand;
pub use self::update::UpdateCommand;

use anyhow::Result;
use colored::Colorize;

use crate::daemon::{check_server_running, BoardClient, Endpoint, ServerStatus};

/// Client for a healthy server, or `None` after telling the user why not.
pub(crate) async fn connect(endpoint: &Endpoint) -> Result<Option<BoardClient>> {
    match check_server_running(endpoint).await? {
        ServerStatus::Running { .. } => Ok(Some(BoardClient::new(endpoint)?)),
        ServerStatus::Unhealthy { error } => {
            println!(
                "{}",
                format!("⚠ Server at {} is up but unhealthy: {}", endpoint.base_url(), error).yellow()
            );
            Ok(None)
        }
        ServerStatus::Stopped => {
            println!(
                "{}",
                format!("No board server reachable at {}.", endpoint.base_url()).red()
            );
            println!("Run 'friends serve' to start one.");
            Ok(None)
        }
    }
}
