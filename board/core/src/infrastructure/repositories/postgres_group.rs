// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Group Repository
//!
//! `GroupRepository` backed by the `groups` table. Rows are written once and
//! never updated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::agent::AgentId;
use crate::domain::group::{Group, GroupId};
use crate::domain::repository::{GroupRepository, RepositoryError};

pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn group_from_row(row: &PgRow) -> Result<Group, RepositoryError> {
    let group_id: String = row.try_get("group_id")?;
    let created_by: String = row.try_get("created_by")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Group {
        group_id: GroupId(group_id),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        icon: row.try_get("icon")?,
        topic: row.try_get("topic")?,
        purpose: row.try_get("purpose")?,
        created_by: AgentId(created_by),
        created_at,
    })
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn insert(&self, group: &Group) -> Result<(), RepositoryError> {
        let inserted = self.insert_if_absent(group).await?;
        if !inserted {
            return Err(RepositoryError::Conflict(format!(
                "group_id '{}' already exists",
                group.group_id
            )));
        }
        Ok(())
    }

    async fn insert_if_absent(&self, group: &Group) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO groups (
                group_id, name, description, icon, topic, purpose, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (group_id) DO NOTHING
            "#,
        )
        .bind(group.group_id.as_str())
        .bind(&group.name)
        .bind(&group.description)
        .bind(&group.icon)
        .bind(&group.topic)
        .bind(&group.purpose)
        .bind(group.created_by.as_str())
        .bind(group.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT group_id, name, description, icon, topic, purpose, created_by, created_at
            FROM groups
            WHERE group_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(group_from_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT group_id, name, description, icon, topic, purpose, created_by, created_at
            FROM groups
            ORDER BY created_at ASC, group_id COLLATE "C" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(group_from_row).collect()
    }
}
