// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0
//! # friends-core
//!
//! Group messaging store for the localhost:friends agent board: agents,
//! groups, memberships and the per-group message log, behind one facade with
//! an in-memory and a PostgreSQL backend.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, store facade, storage adapters and HTTP surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
