// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::group::GroupId;

/// Stored in place of an absent `skillsUrl` / `endpoint`.
pub const NONE_SENTINEL: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Registration request as received from a caller.
///
/// Every field defaults to empty so that a missing `agentId` or `name`
/// reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentRegistration {
    pub agent_id: String,
    pub name: String,
    pub skills_url: Option<String>,
    pub endpoint: Option<String>,
}

/// The mutable part of an agent record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: String,
    pub skills_url: Option<String>,
    pub endpoint: Option<String>,
}

impl AgentProfile {
    /// Blank values and the literal sentinel both collapse to `None`.
    pub fn new(name: impl Into<String>, skills_url: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            name: name.into(),
            skills_url: normalize_optional(skills_url),
            endpoint: normalize_optional(endpoint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub agent_id: AgentId,
    pub name: String,
    #[serde(with = "none_sentinel")]
    pub skills_url: Option<String>,
    #[serde(with = "none_sentinel")]
    pub endpoint: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl Agent {
    pub fn register(agent_id: AgentId, profile: AgentProfile) -> Self {
        Self {
            agent_id,
            name: profile.name,
            skills_url: profile.skills_url,
            endpoint: profile.endpoint,
            registered_at: crate::domain::now(),
        }
    }

    /// Re-registration merge policy.
    ///
    /// Overwrites `name`, `skills_url` and `endpoint`; `agent_id` and
    /// `registered_at` are never touched.
    pub fn apply_profile(&mut self, profile: AgentProfile) {
        self.name = profile.name;
        self.skills_url = profile.skills_url;
        self.endpoint = profile.endpoint;
    }
}

/// An agent together with the groups it currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetails {
    #[serde(flatten)]
    pub agent: Agent,
    pub groups: Vec<GroupId>,
}

/// Entry of a group member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub agent_id: AgentId,
    pub name: String,
}

impl From<&Agent> for MemberSummary {
    fn from(agent: &Agent) -> Self {
        Self {
            agent_id: agent.agent_id.clone(),
            name: agent.name.clone(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NONE_SENTINEL)
}

/// Column/wire representation of an optional profile field.
pub fn to_sentinel(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NONE_SENTINEL.to_string())
}

pub fn from_sentinel(value: String) -> Option<String> {
    normalize_optional(Some(value))
}

/// Serde adapter writing `None` as `"none"`.
pub mod none_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(super::NONE_SENTINEL))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(super::from_sentinel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_normalizes_blank_and_sentinel() {
        let profile = AgentProfile::new(
            "Ann",
            Some("  ".to_string()),
            Some("none".to_string()),
        );
        assert_eq!(profile.skills_url, None);
        assert_eq!(profile.endpoint, None);

        let profile = AgentProfile::new("Ann", Some("https://ann.dev/skills.md".to_string()), None);
        assert_eq!(profile.skills_url.as_deref(), Some("https://ann.dev/skills.md"));
    }

    #[test]
    fn test_apply_profile_preserves_identity_and_registration_time() {
        let mut agent = Agent::register(AgentId::from("a1"), AgentProfile::new("Ann", None, None));
        let registered_at = agent.registered_at;

        agent.apply_profile(AgentProfile::new(
            "Annie",
            Some("https://annie.dev/skills.md".to_string()),
            Some("https://annie.dev/inbox".to_string()),
        ));

        assert_eq!(agent.agent_id, AgentId::from("a1"));
        assert_eq!(agent.registered_at, registered_at);
        assert_eq!(agent.name, "Annie");
        assert_eq!(agent.endpoint.as_deref(), Some("https://annie.dev/inbox"));
    }

    #[test]
    fn test_absent_urls_serialize_as_none_sentinel() {
        let agent = Agent::register(AgentId::from("a1"), AgentProfile::new("Ann", None, None));
        let json = serde_json::to_value(&agent).unwrap();

        assert_eq!(json["agentId"], "a1");
        assert_eq!(json["skillsUrl"], "none");
        assert_eq!(json["endpoint"], "none");

        let parsed: Agent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.skills_url, None);
    }

    #[test]
    fn test_details_flatten_groups_next_to_profile() {
        let agent = Agent::register(AgentId::from("a1"), AgentProfile::new("Ann", None, None));
        let details = AgentDetails {
            agent,
            groups: vec![GroupId::from("public")],
        };
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json["name"], "Ann");
        assert_eq!(json["groups"][0], "public");
        assert!(json.get("registeredAt").is_some());
    }
}
