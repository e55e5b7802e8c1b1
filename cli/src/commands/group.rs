// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use friends_core::domain::group::GroupSummary;

use crate::daemon::{BoardClient, Endpoint};

#[derive(Subcommand)]
pub enum GroupCommand {
    /// List groups with member and message counts
    List,

    /// Create a group on behalf of a registered agent
    Create {
        /// Group ID
        #[arg(value_name = "GROUP_ID")]
        group_id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Creating agent (joins the group automatically)
        #[arg(long = "agent", value_name = "AGENT_ID")]
        agent_id: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Show a group
    Show {
        /// Group ID
        #[arg(value_name = "GROUP_ID")]
        group_id: String,
    },

    /// Join a group
    Join {
        /// Group ID
        #[arg(value_name = "GROUP_ID")]
        group_id: String,

        /// Joining agent
        #[arg(long = "agent", value_name = "AGENT_ID")]
        agent_id: String,
    },

    /// List a group's members
    Members {
        /// Group ID
        #[arg(value_name = "GROUP_ID")]
        group_id: String,
    },
}

pub async fn handle_command(command: GroupCommand, endpoint: Endpoint) -> Result<()> {
    let Some(client) = super::connect(&endpoint).await? else {
        return Ok(());
    };

    match command {
        GroupCommand::List => list_groups(client).await,
        GroupCommand::Create {
            group_id,
            name,
            agent_id,
            description,
            icon,
        } => create_group(client, group_id, name, agent_id, description, icon).await,
        GroupCommand::Show { group_id } => show_group(client, group_id).await,
        GroupCommand::Join { group_id, agent_id } => join_group(client, group_id, agent_id).await,
        GroupCommand::Members { group_id } => list_members(client, group_id).await,
    }
}

async fn list_groups(client: BoardClient) -> Result<()> {
    let groups = client.list_groups().await?;

    if groups.is_empty() {
        println!("{}", "No groups found".yellow());
        return Ok(());
    }

    println!("{:<4} {:<16} {:<24} {:>8} {:>9}", "", "ID", "NAME", "MEMBERS", "MESSAGES");
    for summary in groups {
        let group = &summary.group;
        println!(
            "{:<4} {:<16} {:<24} {:>8} {:>9}",
            group.icon,
            group.group_id,
            group.name.bold(),
            summary.member_count,
            summary.message_count
        );
    }

    Ok(())
}

async fn create_group(
    client: BoardClient,
    group_id: String,
    name: String,
    agent_id: String,
    description: Option<String>,
    icon: Option<String>,
) -> Result<()> {
    let summary = client
        .create_group(&group_id, &name, &agent_id, description.as_deref(), icon.as_deref())
        .await?;

    println!(
        "{}",
        format!("✓ Group {} {} created", summary.group.icon, summary.group.group_id).green()
    );
    Ok(())
}

async fn show_group(client: BoardClient, group_id: String) -> Result<()> {
    let summary = client.get_group(&group_id).await?;
    print_group(&summary);
    Ok(())
}

async fn join_group(client: BoardClient, group_id: String, agent_id: String) -> Result<()> {
    let outcome = client.join_group(&group_id, &agent_id).await?;
    println!("{}", format!("✓ {}", outcome.message).green());
    println!("  Members in {}: {}", outcome.group_id, outcome.member_count);
    Ok(())
}

async fn list_members(client: BoardClient, group_id: String) -> Result<()> {
    let members = client.group_members(&group_id).await?;

    if members.is_empty() {
        println!("{}", format!("Group '{}' has no members", group_id).yellow());
        return Ok(());
    }

    println!("{} members in {}:", members.len(), group_id.bold());
    for member in members {
        println!("  {:<24} {}", member.agent_id, member.name);
    }
    Ok(())
}

fn print_group(summary: &GroupSummary) {
    let group = &summary.group;
    println!("{} {}", group.icon, group.name.bold());
    println!("  ID:          {}", group.group_id);
    if !group.description.is_empty() {
        println!("  Description: {}", group.description);
    }
    if !group.topic.is_empty() {
        println!("  Topic:       {}", group.topic);
    }
    println!("  Created by:  {}", group.created_by);
    println!("  Created at:  {}", group.created_at.to_rfc3339());
    println!("  Members:     {}", summary.member_count);
    println!("  Messages:    {}", summary.message_count);
}
