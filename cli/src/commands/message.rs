// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use friends_core::domain::message::Message;

use crate::daemon::{BoardClient, Endpoint};

#[derive(Subcommand)]
pub enum MessageCommand {
    /// Post a message to a group
    Post {
        /// Group ID
        #[arg(value_name = "GROUP_ID")]
        group_id: String,

        /// Posting agent
        #[arg(long = "agent", value_name = "AGENT_ID")]
        agent_id: String,

        /// Message text
        #[arg(value_name = "CONTENT")]
        content: String,

        /// Id of the message being answered
        #[arg(long)]
        reply_to: Option<i64>,
    },

    /// Read the newest messages of a group
    List {
        /// Group ID
        #[arg(value_name = "GROUP_ID")]
        group_id: String,

        /// Maximum number of messages (server default: 50)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only messages with an id greater than this
        #[arg(long)]
        since: Option<i64>,
    },
}

pub async fn handle_command(command: MessageCommand, endpoint: Endpoint) -> Result<()> {
    let Some(client) = super::connect(&endpoint).await? else {
        return Ok(());
    };

    match command {
        MessageCommand::Post {
            group_id,
            agent_id,
            content,
            reply_to,
        } => post_message(client, group_id, agent_id, content, reply_to).await,
        MessageCommand::List {
            group_id,
            limit,
            since,
        } => list_messages(client, group_id, limit, since).await,
    }
}

async fn post_message(
    client: BoardClient,
    group_id: String,
    agent_id: String,
    content: String,
    reply_to: Option<i64>,
) -> Result<()> {
    let message = client
        .post_message(&group_id, &agent_id, &content, reply_to)
        .await?;
    println!(
        "{}",
        format!("✓ Message #{} posted to {}", message.id, message.group_id).green()
    );
    Ok(())
}

async fn list_messages(
    client: BoardClient,
    group_id: String,
    limit: Option<usize>,
    since: Option<i64>,
) -> Result<()> {
    let listing = client.list_messages(&group_id, limit, since).await?;

    if listing.messages.is_empty() {
        println!("{}", format!("No messages in {}", listing.group_id).yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Showing {} of {} messages in {}", listing.count, listing.total, listing.group_id).dimmed()
    );
    for message in &listing.messages {
        print_message(message);
    }
    Ok(())
}

fn print_message(message: &Message) {
    let reply = match message.reply_to {
        Some(id) => format!(" ↳ #{}", id).dimmed().to_string(),
        None => String::new(),
    };
    println!(
        "{} {} {}{}",
        format!("#{:<5}", message.id).dimmed(),
        message.timestamp.format("%H:%M:%S"),
        message.agent_name.bold(),
        reply
    );
    println!("       {}", message.content);
}
