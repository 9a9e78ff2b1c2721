// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and leaderboard endpoints.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_test_app, send};

async fn log_run(app: &axum::Router, user_id: u64, minutes: u32) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/activities",
        Some(user_id),
        Some(json!({"activity_type": "running", "duration": minutes})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_team(app: &axum::Router, coach: u64, name: &str) -> u64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/teams",
        Some(coach),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn test_create_team_makes_coach_a_member() {
    let (app, _) = create_test_app();
    log_run(&app, 1, 40).await;

    let (status, team) = send(
        &app,
        Method::POST,
        "/api/teams",
        Some(1),
        Some(json!({"name": "Harriers", "description": "Early risers"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team["coach"], 1);
    assert_eq!(team["members"], json!([1]));
    assert_eq!(team["member_count"], 1);
    assert_eq!(team["total_points"], 12);
}

#[tokio::test]
async fn test_join_leave_flow_and_errors() {
    let (app, _) = create_test_app();
    let team_id = create_team(&app, 1, "Pacers").await;
    log_run(&app, 2, 20).await;

    let join = format!("/api/teams/{team_id}/join");
    let leave = format!("/api/teams/{team_id}/leave");

    let (status, team) = send(&app, Method::POST, &join, Some(2), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["total_points"], 6);

    let (status, body) = send(&app, Method::POST, &join, Some(2), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_member");

    let (status, body) = send(&app, Method::POST, &leave, Some(1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "coach_cannot_leave");

    let (status, team) = send(&app, Method::POST, &leave, Some(2), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["total_points"], 0);

    let (status, body) = send(&app, Method::POST, &leave, Some(2), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_member");

    let (status, _) = send(&app, Method::POST, "/api/teams/424242/join", Some(2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_team_name_is_conflict() {
    let (app, _) = create_test_app();
    create_team(&app, 1, "Striders").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/teams",
        Some(2),
        Some(json!({"name": "Striders"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_team_listing_and_mine() {
    let (app, _) = create_test_app();
    let small = create_team(&app, 1, "Small").await;
    let big = create_team(&app, 2, "Big").await;
    log_run(&app, 2, 50).await;

    let (_, teams) = send(&app, Method::GET, "/api/teams", Some(3), None).await;
    let ids: Vec<u64> = teams
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![big, small]);

    let (_, mine) = send(&app, Method::GET, "/api/teams/mine", Some(1), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["name"], "Small");

    let (status, team) = send(&app, Method::GET, &format!("/api/teams/{big}"), Some(3), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["total_points"], 15);
}

#[tokio::test]
async fn test_user_leaderboard_over_http() {
    let (app, _) = create_test_app();
    let team_id = create_team(&app, 3, "Leaders").await;
    log_run(&app, 1, 30).await;
    log_run(&app, 2, 60).await;
    log_run(&app, 3, 10).await;
    send(&app, Method::POST, &format!("/api/teams/{team_id}/join"), Some(2), None).await;

    let (status, board) = send(&app, Method::GET, "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let rows: Vec<(u64, u64)> = board
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["rank"].as_u64().unwrap(), e["user_id"].as_u64().unwrap()))
        .collect();
    assert_eq!(rows, vec![(1, 2), (2, 1), (3, 3)]);
    assert_eq!(board[0]["total_points"], 18);
    assert_eq!(board[0]["team_name"], "Leaders");
    assert_eq!(board[0]["activity_count"], 1);

    let (_, top) = send(&app, Method::GET, "/api/leaderboard?limit=1", None, None).await;
    assert_eq!(top.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_team_leaderboard_over_http() {
    let (app, _) = create_test_app();
    let first = create_team(&app, 1, "First").await;
    let second = create_team(&app, 2, "Second").await;
    log_run(&app, 2, 10).await;

    let (status, board) = send(&app, Method::GET, "/api/team-leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board[0]["team_id"], second);
    assert_eq!(board[0]["total_points"], 3);
    assert_eq!(board[1]["team_id"], first);
    assert_eq!(board[1]["rank"], 2);
}

#[tokio::test]
async fn test_leaderboard_limit_bounds() {
    let (app, state) = create_test_app();
    for user_id in 1..=(state.config.leaderboard_max_limit as u64 + 5) {
        state.engine.get_or_create_profile(user_id).await.unwrap();
    }

    let (status, body) = send(&app, Method::GET, "/api/leaderboard?limit=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (_, board) = send(&app, Method::GET, "/api/leaderboard?limit=100000", None, None).await;
    assert_eq!(
        board.as_array().unwrap().len(),
        state.config.leaderboard_max_limit as usize
    );

    let (_, board) = send(&app, Method::GET, "/api/leaderboard", None, None).await;
    assert_eq!(
        board.as_array().unwrap().len(),
        state.config.leaderboard_default_limit as usize
    );
}
