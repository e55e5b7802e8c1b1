// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::agent::AgentId;
use crate::domain::group::GroupId;

pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Global message identifier. Ids are assigned in strictly increasing order
/// across every group, so a single id works as a cursor anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMessage {
    pub agent_id: String,
    pub content: String,
    pub reply_to: Option<MessageId>,
}

/// A validated message waiting for its id.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub group_id: GroupId,
    pub agent_id: AgentId,
    /// Author name at post time. Never refreshed afterwards.
    pub agent_name: String,
    pub content: String,
    pub reply_to: Option<MessageId>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub group_id: GroupId,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub content: String,
    pub reply_to: Option<MessageId>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn from_draft(id: MessageId, draft: MessageDraft) -> Self {
        Self {
            id,
            group_id: draft.group_id,
            agent_id: draft.agent_id,
            agent_name: draft.agent_name,
            content: draft.content,
            reply_to: draft.reply_to,
            timestamp: draft.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageQuery {
    pub limit: usize,
    pub since: MessageId,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            since: MessageId(0),
        }
    }
}

impl MessageQuery {
    pub fn new(limit: usize, since: i64) -> Self {
        Self {
            limit,
            since: MessageId(since),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Every message ever posted to the group, regardless of the query.
    pub total: u64,
}

/// Pagination policy shared by every backend.
///
/// Keeps messages with `id > since` in ascending id order and returns the
/// newest `limit` of them. Paging further back requires a smaller `since`,
/// not an offset.
pub fn select_page<'a, I>(log: I, query: MessageQuery) -> Vec<Message>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut filtered: Vec<Message> = log
        .into_iter()
        .filter(|m| m.id > query.since)
        .cloned()
        .collect();
    filtered.sort_by_key(|m| m.id);
    let skip = filtered.len().saturating_sub(query.limit);
    filtered.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(ids: &[i64]) -> Vec<Message> {
        ids.iter()
            .map(|id| {
                Message::from_draft(
                    MessageId(*id),
                    MessageDraft {
                        group_id: GroupId::from("team"),
                        agent_id: AgentId::from("a1"),
                        agent_name: "Ann".to_string(),
                        content: format!("message {}", id),
                        reply_to: None,
                        timestamp: crate::domain::now(),
                    },
                )
            })
            .collect()
    }

    fn ids(page: &[Message]) -> Vec<i64> {
        page.iter().map(|m| m.id.0).collect()
    }

    #[test]
    fn test_limit_keeps_the_tail() {
        let log = log_of(&[1, 2, 3, 4, 5]);
        assert_eq!(ids(&select_page(&log, MessageQuery::new(2, 0))), vec![4, 5]);
    }

    #[test]
    fn test_since_is_exclusive() {
        let log = log_of(&[1, 2, 3, 4, 5]);
        assert_eq!(ids(&select_page(&log, MessageQuery::new(50, 3))), vec![4, 5]);
        assert!(select_page(&log, MessageQuery::new(50, 5)).is_empty());
    }

    #[test]
    fn test_since_then_limit() {
        let log = log_of(&[2, 5, 9, 11, 20]);
        assert_eq!(ids(&select_page(&log, MessageQuery::new(2, 4))), vec![11, 20]);
    }

    #[test]
    fn test_zero_limit_returns_nothing() {
        let log = log_of(&[1, 2, 3]);
        assert!(select_page(&log, MessageQuery::new(0, 0)).is_empty());
    }

    #[test]
    fn test_default_query() {
        let query = MessageQuery::default();
        assert_eq!(query.limit, 50);
        assert_eq!(query.since, MessageId(0));
    }
}
