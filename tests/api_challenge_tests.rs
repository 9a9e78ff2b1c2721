// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge, workout catalog and profile endpoints.

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use octofit_tracker::services::seed_demo_data;
use octofit_tracker::time_utils::format_utc_rfc3339;
use serde_json::json;

mod common;
use common::{create_test_app, send};

fn challenge_body(title: &str, start_offset_days: i64, end_offset_days: i64) -> serde_json::Value {
    let now = Utc::now();
    json!({
        "title": title,
        "challenge_type": "distance",
        "target_value": 42.2,
        "activity_types": ["running"],
        "start_date": format_utc_rfc3339(now + Duration::days(start_offset_days)),
        "end_date": format_utc_rfc3339(now + Duration::days(end_offset_days)),
        "points_reward": 100,
    })
}

#[tokio::test]
async fn test_challenge_lifecycle() {
    let (app, state) = create_test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/challenges",
        Some(1),
        Some(challenge_body("Marathon Month", -1, 29)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_active"], true);
    assert_eq!(created["participant_count"], 0);
    let id = created["id"].as_u64().unwrap();

    let join = format!("/api/challenges/{id}/join");
    let (status, joined) = send(&app, Method::POST, &join, Some(2), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["participant_count"], 1);
    assert_eq!(joined["is_participating"], true);

    let (status, body) = send(&app, Method::POST, &join, Some(2), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_participating");

    let (_, mine) = send(&app, Method::GET, "/api/challenges/mine", Some(2), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let leave = format!("/api/challenges/{id}/leave");
    let (status, _) = send(&app, Method::POST, &leave, Some(2), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::POST, &leave, Some(2), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_participating");

    // Rewards never feed point totals.
    assert!(state.db.get_profile(2).await.is_none());
}

#[tokio::test]
async fn test_active_filter() {
    let (app, _) = create_test_app();
    for body in [
        challenge_body("Running now", -2, 2),
        challenge_body("Finished", -10, -5),
        challenge_body("Next month", 30, 60),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/challenges", Some(1), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = send(&app, Method::GET, "/api/challenges", Some(1), None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, active) = send(&app, Method::GET, "/api/challenges?active=true", Some(1), None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["title"], "Running now");
}

#[tokio::test]
async fn test_challenge_validation() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/challenges",
        Some(1),
        Some(challenge_body("Backwards", 5, 1)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let mut zero_target = challenge_body("Nothing", 0, 1);
    zero_target["target_value"] = json!(0.0);
    let (status, _) = send(&app, Method::POST, "/api/challenges", Some(1), Some(zero_target)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/challenges/999999", Some(1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workout_catalog() {
    let (app, state) = create_test_app();
    let summary = seed_demo_data(&state.engine, &state.db).await.unwrap();
    assert_eq!(summary.teams, 2);

    let (status, all) = send(&app, Method::GET, "/api/workouts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), summary.workouts);

    let (_, running) = send(
        &app,
        Method::GET,
        "/api/workouts?activity_type=running&fitness_level=intermediate",
        None,
        None,
    )
    .await;
    assert_eq!(running.as_array().unwrap().len(), 1);
    assert_eq!(running[0]["title"], "Tempo Run");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/workouts?activity_type=rowing",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let id = running[0]["id"].as_u64().unwrap();
    let (status, one) = send(&app, Method::GET, &format!("/api/workouts/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["duration"], 40);

    // New profiles start as beginners.
    let (_, for_me) = send(&app, Method::GET, "/api/workouts/for-me", Some(5), None).await;
    let levels: Vec<&str> = for_me
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["fitness_level"].as_str().unwrap())
        .collect();
    assert!(!levels.is_empty());
    assert!(levels.iter().all(|l| *l == "beginner"));
}

#[tokio::test]
async fn test_seeding_twice_skips_existing_teams() {
    let (_, state) = create_test_app();
    seed_demo_data(&state.engine, &state.db).await.unwrap();

    let again = seed_demo_data(&state.engine, &state.db).await.unwrap();
    assert_eq!(again.teams, 0);
    assert_eq!(state.db.all_teams().await.len(), 2);
}

#[tokio::test]
async fn test_profile_update() {
    let (app, _) = create_test_app();

    let (status, profile) = send(
        &app,
        Method::PATCH,
        "/api/profiles/me",
        Some(8),
        Some(json!({
            "display_name": "Wanda",
            "age": 31,
            "fitness_level": "advanced",
            "total_points": 99999,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["display_name"], "Wanda");
    assert_eq!(profile["fitness_level"], "advanced");
    assert_eq!(profile["total_points"], 0);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/profiles/me",
        Some(8),
        Some(json!({"age": 400})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, public) = send(&app, Method::GET, "/api/profiles/8", Some(9), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public["age"], 31);

    let (status, _) = send(&app, Method::GET, "/api/profiles/12345", Some(9), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
