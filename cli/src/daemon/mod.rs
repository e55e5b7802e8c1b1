// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! Board server mode and the client side of talking to it
//!
//! Handles:
//! - Resolving where the server listens
//! - HTTP health checks
//! - Serving the board (see [`server`])

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use friends_core::domain::board_config::BoardConfigManifest;

pub mod client;
pub mod server;

pub use client::BoardClient;
pub use server::start_server;

/// Address of a board server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Flags win; anything not given on the command line comes from the
    /// configuration (including its environment overrides).
    pub fn resolve(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<Self> {
        if let (Some(host), Some(port)) = (host.clone(), port) {
            return Ok(Self { host, port });
        }

        let config = BoardConfigManifest::load_or_default(config_path)?;
        Ok(Self {
            host: host.unwrap_or(config.spec.server.host),
            port: port.unwrap_or(config.spec.server.port),
        })
    }

    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone)]
pub enum ServerStatus {
    Running { uptime: Option<u64> },
    Stopped,
    Unhealthy { error: String },
}

/// Probe `GET /health` on the server.
pub async fn check_server_running(endpoint: &Endpoint) -> Result<ServerStatus> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()?;

    let health_url = format!("{}/health", endpoint.base_url());

    match client.get(&health_url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let uptime = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["uptimeSeconds"].as_u64());
            Ok(ServerStatus::Running { uptime })
        }
        Ok(resp) => Ok(ServerStatus::Unhealthy {
            error: format!("HTTP {}", resp.status()),
        }),
        Err(_) => Ok(ServerStatus::Stopped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_adds_scheme_when_missing() {
        let plain = Endpoint { host: "127.0.0.1".to_string(), port: 3000 };
        assert_eq!(plain.base_url(), "http://127.0.0.1:3000");

        let schemed = Endpoint { host: "https://board.local".to_string(), port: 8443 };
        assert_eq!(schemed.base_url(), "https://board.local:8443");
    }

    #[test]
    fn test_explicit_flags_skip_configuration() {
        let endpoint = Endpoint::resolve(
            Some(PathBuf::from("/definitely/missing.yaml")),
            Some("10.0.0.5".to_string()),
            Some(4000),
        )
        .unwrap();
        assert_eq!(endpoint, Endpoint { host: "10.0.0.5".to_string(), port: 4000 });
    }

    #[tokio::test]
    async fn test_health_probe_reports_uptime() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"healthy","uptimeSeconds":42}"#)
            .create_async()
            .await;

        let endpoint = endpoint_for(&server);
        match check_server_running(&endpoint).await.unwrap() {
            ServerStatus::Running { uptime } => assert_eq!(uptime, Some(42)),
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_health_probe_reports_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/health").with_status(500).create_async().await;

        let endpoint = endpoint_for(&server);
        assert!(matches!(
            check_server_running(&endpoint).await.unwrap(),
            ServerStatus::Unhealthy { .. }
        ));
    }

    fn endpoint_for(server: &mockito::ServerGuard) -> Endpoint {
        let url = server.url();
        let (host, port) = url.rsplit_once(':').unwrap();
        Endpoint {
            host: host.to_string(),
            port: port.parse().unwrap(),
        }
    }
}
