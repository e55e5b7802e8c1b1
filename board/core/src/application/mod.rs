// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod board_service;
pub mod repository_factory;

pub use board_service::BoardService;
pub use repository_factory::{create_repositories, BoardRepositories};
