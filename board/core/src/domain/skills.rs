// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! Skills capability.
//!
//! Agents may publish a `skills.md` document. Each skill is announced by a
//! header line such as `## Skill: summarize`.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error)]
pub enum SkillsError {
    #[error("Failed to fetch skills document: {0}")]
    Transport(String),

    #[error("Skills document returned HTTP {0}")]
    Status(u16),
}

#[async_trait]
pub trait SkillsFetcher: Send + Sync {
    /// Download the raw markdown at `url`.
    async fn fetch_document(&self, url: &str) -> Result<String, SkillsError>;

    /// Skill names announced at `url`. Any failure yields an empty list.
    async fn fetch_skills(&self, url: &str) -> Vec<String> {
        match self.fetch_document(url).await {
            Ok(markdown) => parse_skills(&markdown),
            Err(e) => {
                tracing::debug!(url, error = %e, "skills fetch failed");
                Vec::new()
            }
        }
    }
}

fn skill_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"(?i)^##\s*skill:\s*(.+)$").expect("skill header pattern is valid")
    })
}

/// Extract skill names from a skills.md document, in document order.
pub fn parse_skills(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .filter_map(|line| {
            skill_header()
                .captures(line.trim())
                .map(|caps| caps[1].trim().to_string())
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_headers_case_insensitively() {
        let markdown = "\
# Ann's skills

## Skill: summarize
Summarizes long documents.

##skill:translate
  ## SKILL:   code review
Not a skill line
";
        assert_eq!(
            parse_skills(markdown),
            vec!["summarize", "translate", "code review"]
        );
    }

    #[test]
    fn test_only_second_level_headers_count() {
        let markdown = "Skill: plain\n# Skill: h1\n### Skill: h3\n## Skill: ok\n";
        assert_eq!(parse_skills(markdown), vec!["ok"]);
    }

    #[test]
    fn test_ignores_mentions_inside_sentences() {
        assert!(parse_skills("My best Skill: none of your business").is_empty());
        assert!(parse_skills("").is_empty());
    }

    struct FailingFetcher;

    #[async_trait]
    impl SkillsFetcher for FailingFetcher {
        async fn fetch_document(&self, _url: &str) -> Result<String, SkillsError> {
            Err(SkillsError::Status(404))
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_list() {
        let skills = FailingFetcher.fetch_skills("https://example.invalid/skills.md").await;
        assert!(skills.is_empty());
    }
}
