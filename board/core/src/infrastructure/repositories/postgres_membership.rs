// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Membership Repository
//!
//! Both directions of the agent/group relation are read from the single
//! `group_members` table, so a join is one row insert.

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::domain::agent::AgentId;
use crate::domain::group::GroupId;
use crate::domain::repository::{MembershipRepository, RepositoryError};

pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn add(&self, group_id: &GroupId, agent_id: &AgentId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, agent_id)
            VALUES ($1, $2)
            ON CONFLICT (group_id, agent_id) DO NOTHING
            "#,
        )
        .bind(group_id.as_str())
        .bind(agent_id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn members_of(&self, group_id: &GroupId) -> Result<Vec<AgentId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT agent_id FROM group_members
            WHERE group_id = $1
            ORDER BY agent_id COLLATE "C" ASC
            "#,
        )
        .bind(group_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(AgentId).collect())
    }

    async fn groups_of(&self, agent_id: &AgentId) -> Result<Vec<GroupId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT group_id FROM group_members
            WHERE agent_id = $1
            ORDER BY group_id COLLATE "C" ASC
            "#,
        )
        .bind(agent_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(GroupId).collect())
    }

    async fn count_members(&self, group_id: &GroupId) -> Result<u64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
            .bind(group_id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
