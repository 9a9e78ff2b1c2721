// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use octofit_tracker::error::AppError;

#[test]
fn test_precondition_errors_are_client_errors() {
    for err in [
        AppError::AlreadyMember,
        AppError::NotMember,
        AppError::CoachCannotLeave,
        AppError::AlreadyParticipating,
        AppError::NotParticipating,
        AppError::Validation("duration must not be negative".to_string()),
    ] {
        assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
    }
}

#[test]
fn test_error_codes_are_distinct() {
    let codes = [
        AppError::AlreadyMember.code(),
        AppError::NotMember.code(),
        AppError::CoachCannotLeave.code(),
        AppError::AlreadyParticipating.code(),
        AppError::NotParticipating.code(),
    ];
    for (i, a) in codes.iter().enumerate() {
        for b in &codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_aggregation_inconsistency_hides_details() {
    let err = AppError::AggregationInconsistency("points total overflowed for user 1".to_string());
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), "aggregation_error");

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_body_shape() {
    let response = AppError::Conflict("Team name 'Blue' is taken".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "conflict");
    assert_eq!(json["details"], "Team name 'Blue' is taken");
}

#[test]
fn test_internal_error_from_anyhow() {
    let err: AppError = anyhow::anyhow!("disk on fire").into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), "internal_error");
}
