// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Agent Repository
//!
//! `AgentRepository` backed by the `agents` table via `sqlx`. Absent
//! `skills_url` / `endpoint` values are stored as the `"none"` sentinel and
//! `registered_at` lives in `created_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::agent::{from_sentinel, to_sentinel, Agent, AgentId, AgentProfile};
use crate::domain::repository::{AgentRepository, RepositoryError};

pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn agent_from_row(row: &PgRow) -> Result<Agent, RepositoryError> {
    let agent_id: String = row.try_get("agent_id")?;
    let name: String = row.try_get("name")?;
    let skills_url: String = row.try_get("skills_url")?;
    let endpoint: String = row.try_get("endpoint")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Agent {
        agent_id: AgentId(agent_id),
        name,
        skills_url: from_sentinel(skills_url),
        endpoint: from_sentinel(endpoint),
        registered_at: created_at,
    })
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn upsert(&self, id: &AgentId, profile: AgentProfile) -> Result<Agent, RepositoryError> {
        // registration time survives re-registration
        let row = sqlx::query(
            r#"
            INSERT INTO agents (agent_id, name, skills_url, endpoint, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (agent_id) DO UPDATE SET
                name = EXCLUDED.name,
                skills_url = EXCLUDED.skills_url,
                endpoint = EXCLUDED.endpoint
            RETURNING agent_id, name, skills_url, endpoint, created_at
            "#,
        )
        .bind(id.as_str())
        .bind(&profile.name)
        .bind(to_sentinel(&profile.skills_url))
        .bind(to_sentinel(&profile.endpoint))
        .bind(crate::domain::now())
        .fetch_one(&self.pool)
        .await?;

        agent_from_row(&row)
    }

    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT agent_id, name, skills_url, endpoint, created_at
            FROM agents
            WHERE agent_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(agent_from_row).transpose()
    }

    async fn find_many(&self, ids: &[AgentId]) -> Result<Vec<Agent>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = ids.iter().map(|id| id.0.clone()).collect();

        let rows = sqlx::query(
            r#"
            SELECT agent_id, name, skills_url, endpoint, created_at
            FROM agents
            WHERE agent_id = ANY($1)
            "#,
        )
        .bind(keys)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(agent_from_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT agent_id, name, skills_url, endpoint, created_at
            FROM agents
            ORDER BY created_at ASC, agent_id COLLATE "C" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(agent_from_row).collect()
    }

    async fn exists(&self, id: &AgentId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM agents WHERE agent_id = $1)")
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
