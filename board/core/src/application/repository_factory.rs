// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Builds the four board repositories for the configured storage backend.
//! The domain layer only sees the traits; which implementation sits behind
//! them is decided here, once, at startup.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Select and construct repository implementations

use anyhow::Result;
use std::sync::Arc;

use crate::application::board_service::BoardService;
use crate::domain::repository::{
    AgentRepository, GroupRepository, MembershipRepository, MessageRepository, StorageBackend,
};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_agent::PostgresAgentRepository;
use crate::infrastructure::repositories::postgres_group::PostgresGroupRepository;
use crate::infrastructure::repositories::postgres_membership::PostgresMembershipRepository;
use crate::infrastructure::repositories::postgres_message::PostgresMessageRepository;
use crate::infrastructure::repositories::{
    InMemoryAgentRepository, InMemoryGroupRepository, InMemoryMembershipRepository,
    InMemoryMessageRepository,
};

/// One repository per board collection, all on the same backend.
#[derive(Clone)]
pub struct BoardRepositories {
    pub agents: Arc<dyn AgentRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub messages: Arc<dyn MessageRepository>,
}

impl BoardRepositories {
    pub fn in_memory() -> Self {
        Self {
            agents: Arc::new(InMemoryAgentRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            memberships: Arc::new(InMemoryMembershipRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
        }
    }

    pub fn postgres(database: &Database) -> Self {
        let pool = database.get_pool().clone();
        Self {
            agents: Arc::new(PostgresAgentRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            memberships: Arc::new(PostgresMembershipRepository::new(pool.clone())),
            messages: Arc::new(PostgresMessageRepository::new(pool)),
        }
    }

    pub fn into_service(self) -> BoardService {
        BoardService::new(self.agents, self.groups, self.memberships, self.messages)
    }
}

/// Creates the repositories for `backend`. For PostgreSQL this connects the
/// pool and applies pending migrations first.
pub async fn create_repositories(backend: &StorageBackend) -> Result<BoardRepositories> {
    match backend {
        StorageBackend::InMemory => {
            tracing::info!("Using in-memory storage backend");
            Ok(BoardRepositories::in_memory())
        }
        StorageBackend::PostgreSQL(config) => {
            tracing::info!("Using PostgreSQL storage backend");
            let database = Database::connect(config).await?;
            database.migrate().await?;
            Ok(BoardRepositories::postgres(&database))
        }
    }
}
