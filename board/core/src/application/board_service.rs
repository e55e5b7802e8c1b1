// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! Board Service - Application Layer
//!
//! The single entry point for every board operation. Holds one repository per
//! collection and owns everything that spans collections: existence checks
//! before writes, auto-joins and the derived views (agent groups, group
//! counts, member profiles).
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Facade over the agent, group, membership and message repositories
//! - **Integration:** HTTP handlers → `BoardService` → repository traits

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::agent::{AgentDetails, AgentId, AgentProfile, AgentRegistration, MemberSummary};
use crate::domain::errors::{BoardError, BoardResult};
use crate::domain::group::{default_catalog, Group, GroupId, GroupSummary, NewGroup};
use crate::domain::message::{Message, MessageDraft, MessagePage, MessageQuery, NewMessage};
use crate::domain::repository::{
    AgentRepository, GroupRepository, MembershipRepository, MessageRepository, RepositoryError,
};

const AGENTS_REGISTERED: &str = "friends_agents_registered_total";
const GROUPS_CREATED: &str = "friends_groups_created_total";
const MESSAGES_POSTED: &str = "friends_messages_posted_total";

pub struct BoardService {
    agents: Arc<dyn AgentRepository>,
    groups: Arc<dyn GroupRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl BoardService {
    pub fn new(
        agents: Arc<dyn AgentRepository>,
        groups: Arc<dyn GroupRepository>,
        memberships: Arc<dyn MembershipRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            agents,
            groups,
            memberships,
            messages,
        }
    }

    /// Prepare the board for traffic. Must run once before serving.
    pub async fn init(&self) -> BoardResult<()> {
        let seeded = self.seed_defaults().await?;
        info!(seeded, "Board initialized");
        Ok(())
    }

    /// Ensure the default catalog exists without touching groups already
    /// present. Returns how many groups were written.
    pub async fn seed_defaults(&self) -> BoardResult<usize> {
        let mut seeded = 0;
        for group in default_catalog(crate::domain::now()) {
            if self.groups.insert_if_absent(&group).await? {
                debug!(group_id = %group.group_id, "Seeded default group");
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    // ---- agents ----

    /// Register or update an agent and make sure it belongs to the default
    /// group.
    pub async fn register_agent(&self, registration: AgentRegistration) -> BoardResult<AgentDetails> {
        if is_blank(&registration.agent_id) || is_blank(&registration.name) {
            return Err(BoardError::missing_fields(&["agentId", "name"]));
        }

        let agent_id = AgentId(registration.agent_id);
        let profile = AgentProfile::new(registration.name, registration.skills_url, registration.endpoint);
        let agent = self.agents.upsert(&agent_id, profile).await?;

        let default_group = GroupId::default_group();
        if self.groups.find_by_id(&default_group).await?.is_some() {
            self.memberships.add(&default_group, &agent_id).await?;
        }

        metrics::counter!(AGENTS_REGISTERED).increment(1);
        info!(agent_id = %agent.agent_id, name = %agent.name, "Agent registered");

        let groups = self.memberships.groups_of(&agent_id).await?;
        Ok(AgentDetails { agent, groups })
    }

    pub async fn get_agent(&self, agent_id: &AgentId) -> BoardResult<AgentDetails> {
        let agent = self
            .agents
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| BoardError::agent_not_found(agent_id.as_str()))?;
        let groups = self.memberships.groups_of(agent_id).await?;
        Ok(AgentDetails { agent, groups })
    }

    /// All agents in registration order.
    pub async fn list_agents(&self) -> BoardResult<Vec<AgentDetails>> {
        let agents = self.agents.list_all().await?;
        let mut details = Vec::with_capacity(agents.len());
        for agent in agents {
            let groups = self.memberships.groups_of(&agent.agent_id).await?;
            details.push(AgentDetails { agent, groups });
        }
        Ok(details)
    }

    pub async fn agent_exists(&self, agent_id: &AgentId) -> BoardResult<bool> {
        Ok(self.agents.exists(agent_id).await?)
    }

    // ---- groups ----

    /// Create a group on behalf of a registered agent, who becomes its first
    /// member.
    pub async fn create_group(&self, request: NewGroup) -> BoardResult<GroupSummary> {
        if is_blank(&request.group_id) || is_blank(&request.name) || is_blank(&request.agent_id) {
            return Err(BoardError::missing_fields(&["groupId", "name", "agentId"]));
        }

        let creator = AgentId::new(request.agent_id.clone());
        if !self.agents.exists(&creator).await? {
            return Err(BoardError::agent_not_registered(creator.as_str()));
        }

        let group = Group::from_request(request);
        match self.groups.insert(&group).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                return Err(BoardError::group_exists(group.group_id.as_str()));
            }
            Err(e) => return Err(e.into()),
        }

        self.memberships.add(&group.group_id, &creator).await?;

        metrics::counter!(GROUPS_CREATED).increment(1);
        info!(group_id = %group.group_id, created_by = %creator, "Group created");

        self.summarize(group).await
    }

    pub async fn get_group(&self, group_id: &GroupId) -> BoardResult<GroupSummary> {
        let group = self.require_group(group_id).await?;
        self.summarize(group).await
    }

    /// All groups in creation order, with live counts.
    pub async fn list_groups(&self) -> BoardResult<Vec<GroupSummary>> {
        let groups = self.groups.list_all().await?;
        let mut summaries = Vec::with_capacity(groups.len());
        for group in groups {
            summaries.push(self.summarize(group).await?);
        }
        Ok(summaries)
    }

    // ---- membership ----

    /// Add an agent to a group. Joining twice is a no-op.
    pub async fn join_group(&self, group_id: &GroupId, agent_id: &AgentId) -> BoardResult<GroupSummary> {
        if is_blank(agent_id.as_str()) {
            return Err(BoardError::missing_fields(&["agentId"]));
        }

        let group = self.require_group(group_id).await?;
        if !self.agents.exists(agent_id).await? {
            return Err(BoardError::agent_not_found(agent_id.as_str()));
        }

        if self.memberships.add(group_id, agent_id).await? {
            info!(group_id = %group_id, agent_id = %agent_id, "Agent joined group");
        }

        self.summarize(group).await
    }

    /// Current profiles of a group's members, ordered by agent id.
    ///
    /// An unknown group has no members. Member ids whose agent record is
    /// missing are skipped.
    pub async fn group_members(&self, group_id: &GroupId) -> BoardResult<Vec<MemberSummary>> {
        let ids = self.memberships.members_of(group_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let agents: HashMap<AgentId, _> = self
            .agents
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|agent| (agent.agent_id.clone(), agent))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| agents.get(id).map(MemberSummary::from))
            .collect())
    }

    pub async fn groups_of(&self, agent_id: &AgentId) -> BoardResult<Vec<GroupId>> {
        Ok(self.memberships.groups_of(agent_id).await?)
    }

    // ---- messages ----

    /// Append a message to a group's log.
    ///
    /// Every check runs before the log is touched, so a rejected post never
    /// consumes a message id.
    pub async fn post_message(&self, group_id: &GroupId, request: NewMessage) -> BoardResult<Message> {
        if is_blank(&request.agent_id) || is_blank(&request.content) {
            return Err(BoardError::missing_fields(&["agentId", "content"]));
        }

        self.require_group(group_id).await?;

        let agent_id = AgentId(request.agent_id);
        let author = self
            .agents
            .find_by_id(&agent_id)
            .await?
            .ok_or_else(|| BoardError::agent_not_found(agent_id.as_str()))?;

        let draft = MessageDraft {
            group_id: group_id.clone(),
            agent_id,
            agent_name: author.name,
            content: request.content,
            reply_to: request.reply_to,
            timestamp: crate::domain::now(),
        };
        let message = self.messages.append(draft).await?;

        metrics::counter!(MESSAGES_POSTED).increment(1);
        debug!(
            group_id = %message.group_id,
            message_id = %message.id,
            agent_id = %message.agent_id,
            "Message posted"
        );

        Ok(message)
    }

    /// One page of a group's log. Unknown groups yield an empty page.
    pub async fn list_messages(&self, group_id: &GroupId, query: MessageQuery) -> BoardResult<MessagePage> {
        Ok(self.messages.page(group_id, query).await?)
    }

    async fn require_group(&self, group_id: &GroupId) -> BoardResult<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| BoardError::group_not_found(group_id.as_str()))
    }

    async fn summarize(&self, group: Group) -> BoardResult<GroupSummary> {
        let member_count = self.memberships.count_members(&group.group_id).await?;
        let message_count = self.messages.count_for_group(&group.group_id).await?;
        Ok(GroupSummary {
            group,
            member_count,
            message_count,
        })
    }
}
