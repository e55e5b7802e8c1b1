// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer
//!
//! Entities, value objects and persistence contracts for the board. Nothing
//! in here knows about HTTP or SQL.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`agent`] | `Agent`, `AgentId`, registration merge policy |
//! | [`group`] | `Group`, `GroupId`, default catalog |
//! | [`message`] | `Message`, `MessageId`, pagination query and page |
//! | [`repository`] | Repository traits, `StorageBackend`, `RepositoryError` |
//! | [`errors`] | `BoardError` taxonomy surfaced by the facade |
//! | [`skills`] | `SkillsFetcher` capability and the skills.md parser |
//! | [`board_config`] | YAML configuration manifest |

pub mod agent;
pub mod board_config;
pub mod errors;
pub mod group;
pub mod message;
pub mod repository;
pub mod skills;

/// Current time truncated to microseconds.
///
/// PostgreSQL stores `TIMESTAMPTZ` with microsecond precision; truncating up
/// front keeps the in-memory backend's ordering and serialized timestamps
/// identical to what the relational backend returns.
pub fn now() -> chrono::DateTime<chrono::Utc> {
    use chrono::SubsecRound;
    chrono::Utc::now().trunc_subsecs(6)
}
