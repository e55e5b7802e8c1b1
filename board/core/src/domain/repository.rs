// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for the four board collections. Interfaces live in
//! the domain layer; implementations live in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Collection | Implementations |
//! |-------|-----------|----------------|
//! | `AgentRepository` | agents | `InMemoryAgentRepository`, `PostgresAgentRepository` |
//! | `GroupRepository` | groups | `InMemoryGroupRepository`, `PostgresGroupRepository` |
//! | `MembershipRepository` | group_members | `InMemoryMembershipRepository`, `PostgresMembershipRepository` |
//! | `MessageRepository` | messages | `InMemoryMessageRepository`, `PostgresMessageRepository` |
//!
//! Repositories do not check cross-collection references; the
//! `BoardService` facade does that before delegating.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::agent::{Agent, AgentId, AgentProfile};
use crate::domain::group::{Group, GroupId};
use crate::domain::message::{Message, MessageDraft, MessagePage, MessageQuery};

/// Storage backend selected at startup.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
    /// Server-side `statement_timeout` applied to every connection.
    pub statement_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(5),
        }
    }
}

#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Insert a new agent or merge `profile` into the existing one.
    /// Returns the stored record.
    async fn upsert(&self, id: &AgentId, profile: AgentProfile) -> Result<Agent, RepositoryError>;

    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError>;

    /// Agents among `ids` that exist, in no particular order.
    async fn find_many(&self, ids: &[AgentId]) -> Result<Vec<Agent>, RepositoryError>;

    /// All agents ordered by `(registered_at, agent_id)`.
    async fn list_all(&self) -> Result<Vec<Agent>, RepositoryError>;

    async fn exists(&self, id: &AgentId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fails with `RepositoryError::Conflict` if the id is taken.
    async fn insert(&self, group: &Group) -> Result<(), RepositoryError>;

    /// Insert unless the id is taken. Returns whether a row was written.
    async fn insert_if_absent(&self, group: &Group) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, RepositoryError>;

    /// All groups ordered by `(created_at, group_id)`.
    async fn list_all(&self) -> Result<Vec<Group>, RepositoryError>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Record the pair. Returns `false` if it already existed.
    async fn add(&self, group_id: &GroupId, agent_id: &AgentId) -> Result<bool, RepositoryError>;

    /// Member ids ordered by agent id.
    async fn members_of(&self, group_id: &GroupId) -> Result<Vec<AgentId>, RepositoryError>;

    /// Group ids ordered by group id.
    async fn groups_of(&self, agent_id: &AgentId) -> Result<Vec<GroupId>, RepositoryError>;

    async fn count_members(&self, group_id: &GroupId) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Assign the next global id and append. Ids are never reused and are
    /// strictly greater than any id handed out before.
    async fn append(&self, draft: MessageDraft) -> Result<Message, RepositoryError>;

    /// One page of a group's log, see `crate::domain::message::select_page`.
    /// Unknown groups yield an empty page.
    async fn page(&self, group_id: &GroupId, query: MessageQuery) -> Result<MessagePage, RepositoryError>;

    async fn count_for_group(&self, group_id: &GroupId) -> Result<u64, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Duplicate key: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

const UNIQUE_VIOLATION: &str = "23505";
const QUERY_CANCELED: &str = "57014";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepositoryError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => RepositoryError::Conflict(db_err.message().to_string()),
                Some(QUERY_CANCELED) => RepositoryError::Unavailable(db_err.message().to_string()),
                _ => RepositoryError::Database(err.to_string()),
            },
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Serialization(err.to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}
