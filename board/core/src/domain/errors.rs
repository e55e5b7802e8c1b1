// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::repository::RepositoryError;

/// Errors surfaced by `BoardService`.
///
/// The first three are caller errors and carry a message naming the offending
/// identifier. `Repository` is a backend-transport failure and is never folded
/// into them.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BoardError {
    pub fn missing_fields(fields: &[&str]) -> Self {
        let noun = if fields.len() == 1 { "field" } else { "fields" };
        BoardError::Validation(format!("Missing required {}: {}", noun, fields.join(", ")))
    }

    pub fn agent_not_found(agent_id: &str) -> Self {
        BoardError::NotFound(format!("Agent '{}' not found", agent_id))
    }

    pub fn agent_not_registered(agent_id: &str) -> Self {
        BoardError::NotFound(format!("Agent '{}' not registered", agent_id))
    }

    pub fn group_not_found(group_id: &str) -> Self {
        BoardError::NotFound(format!("Group '{}' not found", group_id))
    }

    pub fn group_exists(group_id: &str) -> Self {
        BoardError::Conflict(format!("Group '{}' already exists", group_id))
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
