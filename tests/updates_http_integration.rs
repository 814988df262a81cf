//! Integration tests for update feed HTTP endpoints.
//!
//! These tests drive the axum router in-process with
//! `tower::ServiceExt::oneshot`, backed by in-memory adapters.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use dao_pulse::adapters::ai::MockAIProvider;
use dao_pulse::adapters::http::{app_router, updates_routes, UpdatesAppState};
use dao_pulse::adapters::impact::LlmImpactAnalyzer;
use dao_pulse::adapters::tally::InMemoryGovernanceProvider;
use dao_pulse::application::GetDaoUpdatesHandler;
use dao_pulse::config::ServerConfig;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn node(id: &str) -> Value {
    json!({"id": id, "status": "executed", "metadata": {"title": format!("P{id}"), "description": "d"}})
}

fn state() -> UpdatesAppState {
    let provider = InMemoryGovernanceProvider::new()
        .with_dao("uniswap", "1", "Uniswap", vec![node("10")])
        .with_dao("aave", "2", "Aave", vec![node("20")]);
    let ai = MockAIProvider::new()
        .with_response("Summary: calm\nAreas: Fees\nRisk: low")
        .with_response("Summary: risky\nAreas: Treasury\nRisk: high");
    let handler = GetDaoUpdatesHandler::new(
        Arc::new(provider),
        Arc::new(LlmImpactAnalyzer::new(Arc::new(ai))),
    );
    UpdatesAppState::new(handler)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// GET /api/daos/:slug/updates
// =============================================================================

#[tokio::test]
async fn get_dao_updates_returns_feed() {
    let request = Request::get("/api/daos/uniswap/updates")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::OK);
    let feed = body.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["id"], "prop_10");
    assert_eq!(feed[0]["dao_name"], "Uniswap");
    assert_eq!(feed[0]["priority"], "important");
}

#[tokio::test]
async fn unknown_dao_returns_empty_list() {
    let request = Request::get("/api/daos/nobody/updates")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// POST /api/updates
// =============================================================================

#[tokio::test]
async fn post_updates_merges_and_ranks_daos() {
    let request = post_json(
        "/api/updates",
        json!({"dao_slugs": ["uniswap", "aave"], "user_holdings": {"UNI": 5}}),
    );

    let (status, body) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["prop_20", "prop_10"]);
}

#[tokio::test]
async fn post_updates_rejects_empty_slug_list() {
    let request = post_json("/api/updates", json!({"dao_slugs": []}));

    let (status, body) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn post_updates_rejects_blank_slug() {
    let request = post_json("/api/updates", json!({"dao_slugs": ["uniswap", " "]}));

    let (status, _) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_updates_rejects_missing_slugs_field() {
    let request = post_json("/api/updates", json!({"user_holdings": {}}));

    let (status, _) = send(updates_routes(state()), request).await;

    assert!(status.is_client_error());
}

// =============================================================================
// Health and layers
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let (status, body) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn app_router_serves_routes_with_layers() {
    let server = ServerConfig {
        cors_origins: Some("http://localhost:5173".to_string()),
        ..Default::default()
    };
    let request = Request::get("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app_router(state(), &server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn slow_feed_build_still_returns_empty_list() {
    let provider = InMemoryGovernanceProvider::new().with_dao(
        "uniswap",
        "1",
        "Uniswap",
        vec![node("1"), node("2"), node("3")],
    );
    let ai = MockAIProvider::new().with_delay(Duration::from_millis(500));
    let handler = GetDaoUpdatesHandler::new(
        Arc::new(provider),
        Arc::new(LlmImpactAnalyzer::new(Arc::new(ai))),
    );
    let server = ServerConfig {
        request_timeout_secs: 1,
        ..Default::default()
    };
    let request = Request::get("/api/daos/uniswap/updates")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app_router(UpdatesAppState::new(handler), &server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn feed_within_deadline_is_returned_through_app_router() {
    let request = post_json("/api/updates", json!({"dao_slugs": ["uniswap"]}));

    let (status, body) = send(app_router(state(), &ServerConfig::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "prop_10");
}

#[tokio::test]
async fn post_updates_ignores_repeated_slugs() {
    let request = post_json("/api/updates", json!({"dao_slugs": ["uniswap", "uniswap"]}));

    let (status, body) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::OK);
    let feed = body.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["id"], "prop_10");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let request = Request::get("/api/nothing").body(Body::empty()).unwrap();

    let (status, _) = send(updates_routes(state()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
