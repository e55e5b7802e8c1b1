// Copyright (c) 2026 localhost:friends contributors
// SPDX-License-Identifier: AGPL-3.0

//! HTTP surface tests. The router is driven in-process with
//! `tower::ServiceExt::oneshot` over an in-memory board.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use friends_core::application::BoardRepositories;
use friends_core::domain::skills::{SkillsError, SkillsFetcher};
use friends_core::presentation::{app, AppState};

/// Serves a fixed document for `good` urls and fails everything else.
struct StubSkillsFetcher;

#[async_trait]
impl SkillsFetcher for StubSkillsFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, SkillsError> {
        if url.contains("good") {
            Ok("# Agent\n## Skill: summarize\n### Skill: internal\n## skill: translate\n".to_string())
        } else {
            Err(SkillsError::Status(503))
        }
    }
}

async fn test_app() -> Router {
    let board = BoardRepositories::in_memory().into_service();
    board.init().await.unwrap();
    app(Arc::new(AppState::new(Arc::new(board), Arc::new(StubSkillsFetcher))))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(app: &Router, uri: &str, content_type: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn register(app: &Router, agent_id: &str, name: &str, skills_url: Option<&str>) {
    let mut body = json!({ "agentId": agent_id, "name": name });
    if let Some(url) = skills_url {
        body["skillsUrl"] = json!(url);
    }
    let (status, _) = send(app, "POST", "/agents/register", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_and_api_info() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "localhost:friends");
    assert!(body["endpoints"]["groups"]["POST /groups/{groupId}/message"].is_string());
}

#[tokio::test]
async fn test_register_returns_created_agent() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/agents/register",
        Some(json!({ "agentId": "a1", "name": "Ann" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Agent registered successfully");
    assert_eq!(body["agent"]["agentId"], "a1");
    assert_eq!(body["agent"]["skillsUrl"], "none");
    assert_eq!(body["agent"]["endpoint"], "none");
    assert_eq!(body["agent"]["groups"], json!(["public"]));
    assert!(body["agent"]["registeredAt"].is_string());
}

#[tokio::test]
async fn test_unreadable_bodies_get_json_errors() {
    let app = test_app().await;

    let cases = [
        ("/agents/register", "application/json", r#"{"agentId": 7, "name": "Ann"}"#),
        ("/agents/register", "text/plain", r#"{"agentId": "a1", "name": "Ann"}"#),
        ("/agents/register", "application/json", ""),
        ("/groups/create", "application/json", "{not json"),
        ("/groups/public/join", "application/json", "42"),
        ("/groups/public/message", "application/json", r#"{"agentId": "a1", "content": 3}"#),
    ];

    for (uri, content_type, body) in cases {
        let (status, value) = send_raw(&app, uri, content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {:?}", uri, body);
        assert!(value["error"].is_string(), "{} {:?}", uri, body);
    }
}

#[tokio::test]
async fn test_register_without_name_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, "POST", "/agents/register", Some(json!({ "agentId": "a1" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: agentId, name");
}

#[tokio::test]
async fn test_agent_lookup_and_skills() {
    let app = test_app().await;
    register(&app, "good-agent", "Good", Some("http://skills.test/good.md")).await;
    register(&app, "bad-agent", "Bad", Some("http://skills.test/bad.md")).await;
    register(&app, "plain-agent", "Plain", None).await;

    let (status, body) = send(&app, "GET", "/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    let agents = body["agents"].as_array().unwrap();
    assert_eq!(agents.len(), 3);
    let skills_of = |id: &str| {
        agents
            .iter()
            .find(|a| a["agentId"] == id)
            .map(|a| a["skills"].clone())
            .unwrap()
    };
    assert_eq!(skills_of("good-agent"), json!(["summarize", "translate"]));
    assert_eq!(skills_of("bad-agent"), json!([]));
    assert_eq!(skills_of("plain-agent"), json!([]));

    let (status, body) = send(&app, "GET", "/agents/good-agent/skills", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skillsUrl"], "http://skills.test/good.md");
    assert_eq!(body["skills"], json!(["summarize", "translate"]));
    assert!(body["raw"].as_str().unwrap().contains("Skill: summarize"));

    let (status, body) = send(&app, "GET", "/agents/bad-agent/skills", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to fetch skills.md");

    let (status, body) = send(&app, "GET", "/agents/plain-agent/skills", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skillsUrl"], "none");
    assert_eq!(body["raw"], "");

    let (status, body) = send(&app, "GET", "/agents/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Agent 'ghost' not found");
}

#[tokio::test]
async fn test_group_lifecycle() {
    let app = test_app().await;
    register(&app, "a1", "Ann", None).await;
    register(&app, "a2", "Bo", None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/groups/create",
        Some(json!({ "groupId": "team", "name": "Team", "agentId": "a2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Group created successfully");
    assert_eq!(body["group"]["createdBy"], "a2");
    assert_eq!(body["group"]["icon"], "💬");
    assert_eq!(body["group"]["memberCount"], 1);

    let (status, body) = send(
        &app,
        "POST",
        "/groups/create",
        Some(json!({ "groupId": "team", "name": "Other", "agentId": "a1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Group 'team' already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/groups/create",
        Some(json!({ "groupId": "solo", "name": "Solo", "agentId": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Agent 'ghost' not registered");

    let (status, body) = send(&app, "POST", "/groups/team/join", Some(json!({ "agentId": "a1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Joined group 'Team'");
    assert_eq!(body["memberCount"], 2);

    let (status, body) = send(&app, "POST", "/groups/team/join", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: agentId");

    let (status, body) = send(&app, "GET", "/groups/team/members", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["memberCount"], 2);
    assert_eq!(
        body["members"],
        json!([{ "agentId": "a1", "name": "Ann" }, { "agentId": "a2", "name": "Bo" }])
    );

    let (status, body) = send(&app, "GET", "/groups/team", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groupId"], "team");
    assert_eq!(body["memberCount"], 2);
    assert_eq!(body["messageCount"], 0);

    let (status, _) = send(&app, "GET", "/groups/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/groups/nope/members", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/groups", None).await;
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups[0]["groupId"], "public");
    assert!(groups.iter().any(|g| g["groupId"] == "team"));
}

#[tokio::test]
async fn test_messages_post_and_page() {
    let app = test_app().await;
    register(&app, "a1", "Ann", None).await;

    for n in 1..=5 {
        let (status, body) = send(
            &app,
            "POST",
            "/groups/public/message",
            Some(json!({ "agentId": "a1", "content": format!("msg {}", n) })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Message posted");
        assert_eq!(body["data"]["id"], n);
        assert_eq!(body["data"]["agentName"], "Ann");
    }

    let (status, body) = send(&app, "GET", "/groups/public/messages?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["messages"][0]["id"], 4);
    assert_eq!(body["messages"][1]["id"], 5);

    let (_, body) = send(&app, "GET", "/groups/public/messages?since=3", None).await;
    assert_eq!(body["count"], 2);

    let (_, body) = send(&app, "GET", "/groups/public/messages?limit=0&since=abc", None).await;
    assert_eq!(body["count"], 5);

    let (status, body) = send(&app, "GET", "/groups/nope/messages", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Group 'nope' not found");

    let (status, body) = send(
        &app,
        "POST",
        "/groups/public/message",
        Some(json!({ "agentId": "a1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: agentId, content");

    let (status, _) = send(
        &app,
        "POST",
        "/groups/nope/message",
        Some(json!({ "agentId": "a1", "content": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        "POST",
        "/groups/public/message",
        Some(json!({ "agentId": "a1", "content": "next", "replyTo": 5 })),
    )
    .await;
    assert_eq!(body["data"]["id"], 6);
    assert_eq!(body["data"]["replyTo"], 5);
}
