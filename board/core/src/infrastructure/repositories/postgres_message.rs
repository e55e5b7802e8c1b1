// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Message Repository
//!
//! `MessageRepository` backed by the `messages` table. Ids come from the
//! table's `BIGSERIAL` sequence, which is global across groups and only
//! advances on an actual insert.
//!
//! Appends take a table lock that conflicts with every other writer, so ids
//! become visible in the order they were drawn. Without it a later id could
//! commit first and a reader's `since` cursor would step over the earlier one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::agent::AgentId;
use crate::domain::group::GroupId;
use crate::domain::message::{Message, MessageDraft, MessageId, MessagePage, MessageQuery};
use crate::domain::repository::{MessageRepository, RepositoryError};

pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &PgRow) -> Result<Message, RepositoryError> {
    let id: i64 = row.try_get("id")?;
    let group_id: String = row.try_get("group_id")?;
    let agent_id: String = row.try_get("agent_id")?;
    let reply_to: Option<i64> = row.try_get("reply_to")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Message {
        id: MessageId(id),
        group_id: GroupId(group_id),
        agent_id: AgentId(agent_id),
        agent_name: row.try_get("agent_name")?,
        content: row.try_get("content")?,
        reply_to: reply_to.map(MessageId),
        timestamp: created_at,
    })
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn append(&self, draft: MessageDraft) -> Result<Message, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // SHARE ROW EXCLUSIVE conflicts with itself and with plain INSERTs, not with readers
        sqlx::query("LOCK TABLE messages IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO messages (group_id, agent_id, agent_name, content, reply_to, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(draft.group_id.as_str())
        .bind(draft.agent_id.as_str())
        .bind(&draft.agent_name)
        .bind(&draft.content)
        .bind(draft.reply_to.map(|r| r.0))
        .bind(draft.timestamp)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Message::from_draft(MessageId(id), draft))
    }

    async fn page(&self, group_id: &GroupId, query: MessageQuery) -> Result<MessagePage, RepositoryError> {
        let total = self.count_for_group(group_id).await?;
        if total == 0 || query.limit == 0 {
            return Ok(MessagePage { messages: Vec::new(), total });
        }

        // Newest `limit` rows past the cursor, flipped back to ascending order
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT id, group_id, agent_id, agent_name, content, reply_to, created_at
            FROM (
                SELECT id, group_id, agent_id, agent_name, content, reply_to, created_at
                FROM messages
                WHERE group_id = $1 AND id > $2
                ORDER BY id DESC
                LIMIT $3
            ) AS tail
            ORDER BY id ASC
            "#,
        )
        .bind(group_id.as_str())
        .bind(query.since.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let messages = rows.iter().map(message_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(MessagePage { messages, total })
    }

    async fn count_for_group(&self, group_id: &GroupId) -> Result<u64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE group_id = $1")
            .bind(group_id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
