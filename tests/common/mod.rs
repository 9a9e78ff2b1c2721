// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use octofit_tracker::config::Config;
use octofit_tracker::db::MemoryDb;
use octofit_tracker::middleware::auth::create_jwt;
use octofit_tracker::routes::create_router;
use octofit_tracker::services::PointsEngine;
use octofit_tracker::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), MemoryDb::new()));
    (create_router(state.clone()), state)
}

/// Engine over a fresh store, for tests that skip HTTP.
#[allow(dead_code)]
pub fn test_engine() -> PointsEngine {
    PointsEngine::new(MemoryDb::new())
}

/// Mint a token the way the identity provider would.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64) -> String {
    create_jwt(user_id, &Config::test_default().jwt_signing_key).unwrap()
}

/// Send a request as `user_id` (or anonymously) and decode the JSON reply.
///
/// Non-JSON or empty bodies come back as `Value::Null`.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<u64>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(
            header::AUTHORIZATION,
            format!("Bearer {}", create_test_jwt(user_id)),
        );
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
