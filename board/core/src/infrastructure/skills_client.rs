// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! Skills Document Fetcher
//!
//! HTTP implementation of `SkillsFetcher`: downloads an agent's published
//! `skills.md` so its skill headers can be listed.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Fetch remote skills documents
//! - **Integration:** External HTTP document → `parse_skills` → API response

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::skills::{SkillsError, SkillsFetcher};

pub struct HttpSkillsFetcher {
    client: Client,
}

impl HttpSkillsFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SkillsError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SkillsError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SkillsFetcher for HttpSkillsFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, SkillsError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SkillsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkillsError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| SkillsError::Transport(e.to_string()))
    }
}
