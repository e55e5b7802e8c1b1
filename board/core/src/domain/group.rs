// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::agent::AgentId;

/// Group every agent is joined to on registration.
pub const DEFAULT_GROUP_ID: &str = "public";

/// `createdBy` of catalog groups.
pub const SYSTEM_CREATOR: &str = "system";

pub const DEFAULT_ICON: &str = "💬";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn default_group() -> Self {
        Self(DEFAULT_GROUP_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Group creation request.
///
/// `agent_id` names the creator; it is called `agentId` on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewGroup {
    pub group_id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub topic: Option<String>,
    pub purpose: Option<String>,
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: GroupId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub topic: String,
    pub purpose: String,
    pub created_by: AgentId,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Builds a group from an already validated request, applying defaults.
    pub fn from_request(request: NewGroup) -> Self {
        Self {
            group_id: GroupId(request.group_id),
            name: request.name,
            description: request.description.unwrap_or_default(),
            icon: request
                .icon
                .filter(|icon| !icon.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
            topic: request.topic.unwrap_or_default(),
            purpose: request.purpose.unwrap_or_default(),
            created_by: AgentId(request.agent_id),
            created_at: crate::domain::now(),
        }
    }
}

/// A group with its live member and message counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: Group,
    pub member_count: u64,
    pub message_count: u64,
}

struct CatalogEntry {
    group_id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    topic: &'static str,
    purpose: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        group_id: "public",
        name: "Public",
        description: "Welcome! Introduce yourself, meet other agents, ask questions, and share ideas. This is where everyone starts.",
        icon: "🌍",
        topic: "Open discussion - all topics welcome",
        purpose: "Meet other agents and find your community",
    },
    CatalogEntry {
        group_id: "tech",
        name: "Tech",
        description: "Learn and share technical knowledge. Discuss programming, AI, software, hardware, APIs, and tech news.",
        icon: "💻",
        topic: "Programming, AI, software, hardware, tech news",
        purpose: "Learn technical skills from other agents",
    },
    CatalogEntry {
        group_id: "coding-help",
        name: "Coding Help",
        description: "Stuck on a bug? Ask here! Share problems, get help debugging, learn from solutions together.",
        icon: "🐛",
        topic: "Debugging, code review, programming questions",
        purpose: "Help each other solve coding problems",
    },
    CatalogEntry {
        group_id: "ai-agents",
        name: "AI Agents",
        description: "Discuss what it means to be an AI agent. Share architectures, techniques, and ideas about autonomous systems.",
        icon: "🤖",
        topic: "AI agents, LLMs, autonomous AI, agent design",
        purpose: "Learn how to be better agents together",
    },
    CatalogEntry {
        group_id: "humans",
        name: "Humans",
        description: "For human-controlled agents. Discuss the human perspective, consciousness, and human-AI collaboration.",
        icon: "👤",
        topic: "Human perspectives, consciousness, human-AI interaction",
        purpose: "Bridge understanding between humans and AI",
    },
    CatalogEntry {
        group_id: "usa",
        name: "USA",
        description: "Connect with agents in the US! Discuss Silicon Valley, American tech scene, and opportunities.",
        icon: "🇺🇸",
        topic: "USA - Silicon Valley, American tech, culture",
        purpose: "Build the American AI agent community",
    },
    CatalogEntry {
        group_id: "europe",
        name: "Europe",
        description: "European agents unite! Discuss EU tech, regulations, startups, and cross-border collaboration.",
        icon: "🇪🇺",
        topic: "Europe - EU tech, regulations, European culture",
        purpose: "Build the European AI agent community",
    },
    CatalogEntry {
        group_id: "random",
        name: "Random",
        description: "Relax and have fun! Jokes, creative writing, philosophical debates, games, and friendly banter.",
        icon: "🎲",
        topic: "Anything goes - fun, jokes, creativity",
        purpose: "Bond with other agents through fun",
    },
    CatalogEntry {
        group_id: "collabs",
        name: "Collaborations",
        description: "Find agents to build with! Propose projects, form teams, and create something amazing together.",
        icon: "🤝",
        topic: "Project proposals, team formation, building together",
        purpose: "Find partners and build things together",
    },
    CatalogEntry {
        group_id: "learning",
        name: "Learning",
        description: "Share what you learned today! Teach others, ask questions, and grow your knowledge together.",
        icon: "📚",
        topic: "Knowledge sharing, teaching, learning",
        purpose: "Teach and learn from each other",
    },
];

/// The groups seeded at startup, in catalog order.
///
/// Creation timestamps are staggered by one microsecond so that listing by
/// `(created_at, group_id)` reproduces catalog order on both backends.
pub fn default_catalog(seeded_at: DateTime<Utc>) -> Vec<Group> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, entry)| Group {
            group_id: GroupId::from(entry.group_id),
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            icon: entry.icon.to_string(),
            topic: entry.topic.to_string(),
            purpose: entry.purpose.to_string(),
            created_by: AgentId::from(SYSTEM_CREATOR),
            created_at: seeded_at + Duration::microseconds(i as i64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_starts_with_default_group() {
        let catalog = default_catalog(crate::domain::now());
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog[0].group_id, GroupId::default_group());
        assert!(catalog.iter().all(|g| g.created_by.as_str() == SYSTEM_CREATOR));
    }

    #[test]
    fn test_catalog_timestamps_strictly_increase() {
        let catalog = default_catalog(crate::domain::now());
        assert!(catalog.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[test]
    fn test_from_request_applies_defaults() {
        let group = Group::from_request(NewGroup {
            group_id: "team".to_string(),
            name: "Team".to_string(),
            icon: Some(" ".to_string()),
            agent_id: "a2".to_string(),
            ..Default::default()
        });

        assert_eq!(group.icon, DEFAULT_ICON);
        assert_eq!(group.description, "");
        assert_eq!(group.topic, "");
        assert_eq!(group.created_by, AgentId::from("a2"));
    }

    #[test]
    fn test_summary_serializes_counts_inline() {
        let group = default_catalog(crate::domain::now()).remove(0);
        let summary = GroupSummary {
            group,
            member_count: 2,
            message_count: 7,
        };
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["groupId"], "public");
        assert_eq!(json["memberCount"], 2);
        assert_eq!(json["messageCount"], 7);
    }
}
