// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public leaderboard routes.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{LeaderboardEntry, TeamLeaderboardEntry};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(user_leaderboard))
        .route("/api/team-leaderboard", get(team_leaderboard))
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u32>,
}

/// Resolve the requested limit: default when absent, clamped to the
/// configured maximum, zero rejected.
fn effective_limit(requested: Option<u32>, config: &Config) -> Result<u32> {
    match requested {
        None => Ok(config
            .leaderboard_default_limit
            .min(config.leaderboard_max_limit)),
        Some(0) => Err(AppError::BadRequest(
            "limit must be greater than 0".to_string(),
        )),
        Some(limit) => Ok(limit.min(config.leaderboard_max_limit)),
    }
}

async fn user_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let limit = effective_limit(params.limit, &state.config)?;
    Ok(Json(state.leaderboard.build_user_leaderboard(limit).await))
}

async fn team_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<TeamLeaderboardEntry>>> {
    let limit = effective_limit(params.limit, &state.config)?;
    Ok(Json(state.leaderboard.build_team_leaderboard(limit).await))
}
