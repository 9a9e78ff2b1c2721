// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("User is already a member of this team")]
    AlreadyMember,

    #[error("User is not a member of this team")]
    NotMember,

    #[error("Team coach cannot leave the team")]
    CoachCannotLeave,

    #[error("User is already participating in this challenge")]
    AlreadyParticipating,

    #[error("User is not participating in this challenge")]
    NotParticipating,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Aggregation inconsistency: {0}")]
    AggregationInconsistency(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::AlreadyMember
            | AppError::NotMember
            | AppError::CoachCannotLeave
            | AppError::AlreadyParticipating
            | AppError::NotParticipating => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AggregationInconsistency(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::InvalidToken => "invalid_token",
            AppError::Validation(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::AlreadyMember => "already_member",
            AppError::NotMember => "not_member",
            AppError::CoachCannotLeave => "coach_cannot_leave",
            AppError::AlreadyParticipating => "already_participating",
            AppError::NotParticipating => "not_participating",
            AppError::Conflict(_) => "conflict",
            AppError::AggregationInconsistency(_) => "aggregation_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => Some(msg.clone()),
            AppError::AlreadyMember
            | AppError::NotMember
            | AppError::CoachCannotLeave
            | AppError::AlreadyParticipating
            | AppError::NotParticipating => Some(self.to_string()),
            AppError::AggregationInconsistency(msg) => {
                tracing::error!(error = %msg, "Aggregation invariant violated");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
            AppError::Unauthorized | AppError::InvalidToken => None,
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Unparseable or mistyped request bodies are validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
