// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository traits defined in
//! `crate::domain::repository`.
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! - **PostgresAgentRepository** - `agents` table, upsert on re-registration
//! - **PostgresGroupRepository** - `groups` table
//! - **PostgresMembershipRepository** - `group_members` join table
//! - **PostgresMessageRepository** - `messages` table, ids from `BIGSERIAL`
//!
//! ## In-Memory Repositories
//!
//! Process-local, lock-guarded maps with the same ordering rules as the
//! PostgreSQL queries:
//! - **InMemoryAgentRepository**
//! - **InMemoryGroupRepository**
//! - **InMemoryMembershipRepository** - both directions under one lock
//! - **InMemoryMessageRepository** - id counter and logs under one lock
//!
//! # Usage
//!
//! ```no_run
//! # async fn demo(database_url: &str) -> anyhow::Result<()> {
//! use friends_core::domain::agent::AgentId;
//! use friends_core::domain::repository::AgentRepository;
//! use friends_core::infrastructure::repositories::postgres_agent::PostgresAgentRepository;
//! use sqlx::PgPool;
//!
//! let pool = PgPool::connect(database_url).await?;
//! let repo = PostgresAgentRepository::new(pool);
//! let agent = repo.find_by_id(&AgentId::from("a1")).await?;
//! # Ok(())
//! # }
//! ```

pub mod postgres_agent;
pub mod postgres_group;
pub mod postgres_membership;
pub mod postgres_message;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::agent::{Agent, AgentId, AgentProfile};
use crate::domain::group::{Group, GroupId};
use crate::domain::message::{select_page, Message, MessageDraft, MessageId, MessagePage, MessageQuery};
use crate::domain::repository::{
    AgentRepository, GroupRepository, MembershipRepository, MessageRepository, RepositoryError,
};

#[derive(Clone, Default)]
pub struct InMemoryAgentRepository {
    agents: Arc<RwLock<HashMap<AgentId, Agent>>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn upsert(&self, id: &AgentId, profile: AgentProfile) -> Result<Agent, RepositoryError> {
        let mut agents = self.agents.write();
        let agent = agents
            .entry(id.clone())
            .and_modify(|existing| existing.apply_profile(profile.clone()))
            .or_insert_with(|| Agent::register(id.clone(), profile));
        Ok(agent.clone())
    }

    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.agents.read().get(id).cloned())
    }

    async fn find_many(&self, ids: &[AgentId]) -> Result<Vec<Agent>, RepositoryError> {
        let agents = self.agents.read();
        Ok(ids.iter().filter_map(|id| agents.get(id).cloned()).collect())
    }

    async fn list_all(&self) -> Result<Vec<Agent>, RepositoryError> {
        let mut list: Vec<Agent> = self.agents.read().values().cloned().collect();
        list.sort_by(|a, b| {
            (a.registered_at, &a.agent_id).cmp(&(b.registered_at, &b.agent_id))
        });
        Ok(list)
    }

    async fn exists(&self, id: &AgentId) -> Result<bool, RepositoryError> {
        Ok(self.agents.read().contains_key(id))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryGroupRepository {
    groups: Arc<RwLock<HashMap<GroupId, Group>>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn insert(&self, group: &Group) -> Result<(), RepositoryError> {
        let mut groups = self.groups.write();
        if groups.contains_key(&group.group_id) {
            return Err(RepositoryError::Conflict(format!(
                "group_id '{}' already exists",
                group.group_id
            )));
        }
        groups.insert(group.group_id.clone(), group.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, group: &Group) -> Result<bool, RepositoryError> {
        let mut groups = self.groups.write();
        if groups.contains_key(&group.group_id) {
            return Ok(false);
        }
        groups.insert(group.group_id.clone(), group.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, RepositoryError> {
        Ok(self.groups.read().get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepositoryError> {
        let mut list: Vec<Group> = self.groups.read().values().cloned().collect();
        list.sort_by(|a, b| (a.created_at, &a.group_id).cmp(&(b.created_at, &b.group_id)));
        Ok(list)
    }
}

/// Both directions of the relation, always mutated together.
#[derive(Default)]
struct MembershipTable {
    by_group: BTreeMap<GroupId, BTreeSet<AgentId>>,
    by_agent: BTreeMap<AgentId, BTreeSet<GroupId>>,
}

#[derive(Clone, Default)]
pub struct InMemoryMembershipRepository {
    table: Arc<RwLock<MembershipTable>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn add(&self, group_id: &GroupId, agent_id: &AgentId) -> Result<bool, RepositoryError> {
        let mut table = self.table.write();
        let added = table
            .by_group
            .entry(group_id.clone())
            .or_default()
            .insert(agent_id.clone());
        table
            .by_agent
            .entry(agent_id.clone())
            .or_default()
            .insert(group_id.clone());
        Ok(added)
    }

    async fn members_of(&self, group_id: &GroupId) -> Result<Vec<AgentId>, RepositoryError> {
        let table = self.table.read();
        Ok(table
            .by_group
            .get(group_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn groups_of(&self, agent_id: &AgentId) -> Result<Vec<GroupId>, RepositoryError> {
        let table = self.table.read();
        Ok(table
            .by_agent
            .get(agent_id)
            .map(|groups| groups.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn count_members(&self, group_id: &GroupId) -> Result<u64, RepositoryError> {
        let table = self.table.read();
        Ok(table.by_group.get(group_id).map_or(0, |m| m.len() as u64))
    }
}

struct MessageLog {
    last_id: i64,
    by_group: HashMap<GroupId, Vec<Message>>,
}

#[derive(Clone)]
pub struct InMemoryMessageRepository {
    log: Arc<Mutex<MessageLog>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(MessageLog {
                last_id: 0,
                by_group: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, draft: MessageDraft) -> Result<Message, RepositoryError> {
        let mut log = self.log.lock();
        log.last_id += 1;
        let message = Message::from_draft(MessageId(log.last_id), draft);
        log.by_group
            .entry(message.group_id.clone())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn page(&self, group_id: &GroupId, query: MessageQuery) -> Result<MessagePage, RepositoryError> {
        let log = self.log.lock();
        let Some(messages) = log.by_group.get(group_id) else {
            return Ok(MessagePage::default());
        };
        Ok(MessagePage {
            messages: select_page(messages, query),
            total: messages.len() as u64,
        })
    }

    async fn count_for_group(&self, group_id: &GroupId) -> Result<u64, RepositoryError> {
        let log = self.log.lock();
        Ok(log.by_group.get(group_id).map_or(0, |m| m.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::default_catalog;

    fn draft(group: &str, content: &str) -> MessageDraft {
        MessageDraft {
            group_id: GroupId::from(group),
            agent_id: AgentId::from("a1"),
            agent_name: "Ann".to_string(),
            content: content.to_string(),
            reply_to: None,
            timestamp: crate::domain::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_merges_profile() {
        let repo = InMemoryAgentRepository::new();
        let first = repo
            .upsert(&AgentId::from("a1"), AgentProfile::new("Ann", None, None))
            .await
            .unwrap();
        let second = repo
            .upsert(&AgentId::from("a1"), AgentProfile::new("Annie", None, None))
            .await
            .unwrap();

        assert_eq!(second.name, "Annie");
        assert_eq!(second.registered_at, first.registered_at);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_many_skips_unknown_ids() {
        let repo = InMemoryAgentRepository::new();
        repo.upsert(&AgentId::from("a1"), AgentProfile::new("Ann", None, None))
            .await
            .unwrap();

        let found = repo
            .find_many(&[AgentId::from("a1"), AgentId::from("ghost")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_group_insert_conflict_keeps_original() {
        let repo = InMemoryGroupRepository::new();
        let mut group = default_catalog(crate::domain::now()).remove(0);
        repo.insert(&group).await.unwrap();

        group.name = "Hijacked".to_string();
        let err = repo.insert(&group).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(!repo.insert_if_absent(&group).await.unwrap());

        let stored = repo.find_by_id(&group.group_id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Public");
    }

    #[tokio::test]
    async fn test_groups_list_in_catalog_order() {
        let repo = InMemoryGroupRepository::new();
        let catalog = default_catalog(crate::domain::now());
        for group in catalog.iter().rev() {
            repo.insert_if_absent(group).await.unwrap();
        }

        let listed: Vec<GroupId> = repo.list_all().await.unwrap().into_iter().map(|g| g.group_id).collect();
        let expected: Vec<GroupId> = catalog.into_iter().map(|g| g.group_id).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_membership_add_is_idempotent_and_two_sided() {
        let repo = InMemoryMembershipRepository::new();
        let group = GroupId::from("team");
        let agent = AgentId::from("a1");

        assert!(repo.add(&group, &agent).await.unwrap());
        assert!(!repo.add(&group, &agent).await.unwrap());

        assert_eq!(repo.count_members(&group).await.unwrap(), 1);
        assert_eq!(repo.members_of(&group).await.unwrap(), vec![agent.clone()]);
        assert_eq!(repo.groups_of(&agent).await.unwrap(), vec![group]);
    }

    #[tokio::test]
    async fn test_message_ids_are_global() {
        let repo = InMemoryMessageRepository::new();
        let x1 = repo.append(draft("x", "one")).await.unwrap();
        let y1 = repo.append(draft("y", "two")).await.unwrap();
        let x2 = repo.append(draft("x", "three")).await.unwrap();

        assert!(x1.id < y1.id && y1.id < x2.id);
        assert_eq!(repo.count_for_group(&GroupId::from("x")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_page_of_unknown_group_is_empty() {
        let repo = InMemoryMessageRepository::new();
        let page = repo.page(&GroupId::from("nope"), MessageQuery::default()).await.unwrap();
        assert!(page.messages.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_concurrent_appends_never_collide() {
        let repo = InMemoryMessageRepository::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.append(draft(if i % 2 == 0 { "x" } else { "y" }, "hi")).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(ids.last(), Some(&MessageId(32)));
    }
}
