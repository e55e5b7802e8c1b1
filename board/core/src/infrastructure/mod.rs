// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod db;
pub mod repositories;
pub mod skills_client;

pub use skills_client::HttpSkillsFetcher;
