// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::daemon::{BoardClient, Endpoint};

#[derive(Subcommand)]
pub enum AgentCommand {
    /// Register an agent, or update its profile
    Register {
        /// Agent ID
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// URL of the agent's skills.md
        #[arg(long)]
        skills_url: Option<String>,

        /// Where the agent can be reached
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// List registered agents with their skills
    List,

    /// Show an agent's profile and groups
    Show {
        /// Agent ID
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
    },

    /// Fetch and print an agent's skills.md
    Skills {
        /// Agent ID
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,

        /// Print the raw document as well
        #[arg(long)]
        raw: bool,
    },
}

pub async fn handle_command(command: AgentCommand, endpoint: Endpoint) -> Result<()> {
    let Some(client) = super::connect(&endpoint).await? else {
        return Ok(());
    };

    match command {
        AgentCommand::Register {
            agent_id,
            name,
            skills_url,
            endpoint,
        } => register_agent(client, agent_id, name, skills_url, endpoint).await,
        AgentCommand::List => list_agents(client).await,
        AgentCommand::Show { agent_id } => show_agent(client, agent_id).await,
        AgentCommand::Skills { agent_id, raw } => show_skills(client, agent_id, raw).await,
    }
}

async fn register_agent(
    client: BoardClient,
    agent_id: String,
    name: String,
    skills_url: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    let agent = client
        .register_agent(&agent_id, &name, skills_url.as_deref(), endpoint.as_deref())
        .await?;

    println!(
        "{}",
        format!("✓ Agent {} registered as {}", agent.agent.agent_id, agent.agent.name).green()
    );
    println!("  Groups: {}", join_ids(agent.groups.iter().map(|g| g.as_str())));
    Ok(())
}

async fn list_agents(client: BoardClient) -> Result<()> {
    let agents = client.list_agents().await?;

    if agents.is_empty() {
        println!("{}", "No agents registered".yellow());
        return Ok(());
    }

    println!("{} agents registered:", agents.len());
    println!("{:<24} {:<24} {:<26} {}", "ID", "NAME", "REGISTERED", "SKILLS");

    for listing in agents {
        let agent = &listing.agent.agent;
        let skills = if listing.skills.is_empty() {
            "-".dimmed().to_string()
        } else {
            listing.skills.join(", ")
        };
        println!(
            "{:<24} {:<24} {:<26} {}",
            agent.agent_id,
            agent.name.bold(),
            agent.registered_at.format("%Y-%m-%d %H:%M:%S UTC"),
            skills
        );
    }

    Ok(())
}

async fn show_agent(client: BoardClient, agent_id: String) -> Result<()> {
    let details = client.get_agent(&agent_id).await?;
    let agent = &details.agent;

    println!("{}", agent.name.bold());
    println!("  ID:         {}", agent.agent_id);
    println!("  Skills URL: {}", agent.skills_url.as_deref().unwrap_or("none"));
    println!("  Endpoint:   {}", agent.endpoint.as_deref().unwrap_or("none"));
    println!("  Registered: {}", agent.registered_at.to_rfc3339());
    println!("  Groups:     {}", join_ids(details.groups.iter().map(|g| g.as_str())));
    Ok(())
}

async fn show_skills(client: BoardClient, agent_id: String, raw: bool) -> Result<()> {
    let skills = client.agent_skills(&agent_id).await?;

    println!("{} ({})", skills.agent_id.bold(), skills.skills_url.dimmed());
    if skills.skills.is_empty() {
        println!("{}", "  No skills advertised".yellow());
    }
    for skill in &skills.skills {
        println!("  - {}", skill);
    }

    if raw && !skills.raw.is_empty() {
        println!();
        println!("{}", skills.raw);
    }
    Ok(())
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = ids.collect();
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined.join(", ")
    }
}
