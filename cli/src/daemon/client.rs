// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for the board API

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use friends_core::domain::agent::{AgentDetails, MemberSummary};
use friends_core::domain::group::GroupSummary;
use friends_core::domain::message::Message;

use super::Endpoint;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentListing {
    #[serde(flatten)]
    pub agent: AgentDetails,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkills {
    pub agent_id: String,
    pub skills_url: String,
    pub raw: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub message: String,
    pub group_id: String,
    pub member_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListing {
    pub group_id: String,
    pub count: usize,
    pub total: u64,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone)]
pub struct BoardClient {
    client: Client,
    base_url: String,
}

impl BoardClient {
    pub fn new(endpoint: &Endpoint) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: endpoint.base_url(),
        })
    }

    pub async fn register_agent(
        &self,
        agent_id: &str,
        name: &str,
        skills_url: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<AgentDetails> {
        let response = self
            .client
            .post(format!("{}/agents/register", self.base_url))
            .json(&json!({
                "agentId": agent_id,
                "name": name,
                "skillsUrl": skills_url,
                "endpoint": endpoint,
            }))
            .send()
            .await
            .context("Failed to register agent")?;

        #[derive(Deserialize)]
        struct RegisterResponse {
            agent: AgentDetails,
        }

        let body: RegisterResponse = parse(response, "register agent").await?;
        Ok(body.agent)
    }

    pub async fn list_agents(&self) -> Result<Vec<AgentListing>> {
        let response = self
            .client
            .get(format!("{}/agents", self.base_url))
            .send()
            .await
            .context("Failed to list agents")?;

        #[derive(Deserialize)]
        struct ListResponse {
            agents: Vec<AgentListing>,
        }

        let body: ListResponse = parse(response, "list agents").await?;
        Ok(body.agents)
    }

    pub async fn get_agent(&self, agent_id: &str) -> Result<AgentDetails> {
        let response = self
            .client
            .get(format!("{}/agents/{}", self.base_url, agent_id))
            .send()
            .await
            .context("Failed to get agent")?;

        #[derive(Deserialize)]
        struct AgentResponse {
            agent: AgentDetails,
        }

        let body: AgentResponse = parse(response, "get agent").await?;
        Ok(body.agent)
    }

    pub async fn agent_skills(&self, agent_id: &str) -> Result<AgentSkills> {
        let response = self
            .client
            .get(format!("{}/agents/{}/skills", self.base_url, agent_id))
            .send()
            .await
            .context("Failed to get agent skills")?;

        parse(response, "get agent skills").await
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
        let response = self
            .client
            .get(format!("{}/groups", self.base_url))
            .send()
            .await
            .context("Failed to list groups")?;

        #[derive(Deserialize)]
        struct ListResponse {
            groups: Vec<GroupSummary>,
        }

        let body: ListResponse = parse(response, "list groups").await?;
        Ok(body.groups)
    }

    pub async fn create_group(
        &self,
        group_id: &str,
        name: &str,
        agent_id: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<GroupSummary> {
        let response = self
            .client
            .post(format!("{}/groups/create", self.base_url))
            .json(&json!({
                "groupId": group_id,
                "name": name,
                "agentId": agent_id,
                "description": description,
                "icon": icon,
            }))
            .send()
            .await
            .context("Failed to create group")?;

        #[derive(Deserialize)]
        struct CreateResponse {
            group: GroupSummary,
        }

        let body: CreateResponse = parse(response, "create group").await?;
        Ok(body.group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<GroupSummary> {
        let response = self
            .client
            .get(format!("{}/groups/{}", self.base_url, group_id))
            .send()
            .await
            .context("Failed to get group")?;

        parse(response, "get group").await
    }

    pub async fn join_group(&self, group_id: &str, agent_id: &str) -> Result<JoinOutcome> {
        let response = self
            .client
            .post(format!("{}/groups/{}/join", self.base_url, group_id))
            .json(&json!({ "agentId": agent_id }))
            .send()
            .await
            .context("Failed to join group")?;

        parse(response, "join group").await
    }

    pub async fn group_members(&self, group_id: &str) -> Result<Vec<MemberSummary>> {
        let response = self
            .client
            .get(format!("{}/groups/{}/members", self.base_url, group_id))
            .send()
            .await
            .context("Failed to list group members")?;

        #[derive(Deserialize)]
        struct MembersResponse {
            members: Vec<MemberSummary>,
        }

        let body: MembersResponse = parse(response, "list group members").await?;
        Ok(body.members)
    }

    pub async fn post_message(
        &self,
        group_id: &str,
        agent_id: &str,
        content: &str,
        reply_to: Option<i64>,
    ) -> Result<Message> {
        let response = self
            .client
            .post(format!("{}/groups/{}/message", self.base_url, group_id))
            .json(&json!({
                "agentId": agent_id,
                "content": content,
                "replyTo": reply_to,
            }))
            .send()
            .await
            .context("Failed to post message")?;

        #[derive(Deserialize)]
        struct PostResponse {
            data: Message,
        }

        let body: PostResponse = parse(response, "post message").await?;
        Ok(body.data)
    }

    pub async fn list_messages(
        &self,
        group_id: &str,
        limit: Option<usize>,
        since: Option<i64>,
    ) -> Result<MessageListing> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(since) = since {
            query.push(("since", since.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/groups/{}/messages", self.base_url, group_id))
            .query(&query)
            .send()
            .await
            .context("Failed to list messages")?;

        parse(response, "list messages").await
    }
}

/// Decode a success body, or turn the server's `{"error": ...}` into an error.
async fn parse<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&error_text)
            .ok()
            .and_then(|v| v["error"].as_str().map(str::to_string))
            .unwrap_or(error_text);
        anyhow::bail!("Failed to {} ({}): {}", action, status, message);
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", action))
}
