// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout suggestion catalog (read-only).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FitnessLevel, WorkoutId, WorkoutSuggestion};
use crate::routes::activities::parse_activity_type;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Catalog routes that need no login.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts))
        .route("/api/workouts/{id}", get(get_workout))
}

/// Suggestions tailored to the caller's profile.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/workouts/for-me", get(workouts_for_me))
}

#[derive(Deserialize)]
struct WorkoutsQuery {
    fitness_level: Option<FitnessLevel>,
    activity_type: Option<String>,
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WorkoutsQuery>,
) -> Result<Json<Vec<WorkoutSuggestion>>> {
    let activity_type = params
        .activity_type
        .as_deref()
        .map(parse_activity_type)
        .transpose()?;
    Ok(Json(
        state
            .db
            .list_workouts(params.fitness_level, activity_type)
            .await,
    ))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<WorkoutId>,
) -> Result<Json<WorkoutSuggestion>> {
    state
        .db
        .get_workout(workout_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", workout_id)))
}

async fn workouts_for_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<WorkoutSuggestion>>> {
    let profile = state.engine.get_or_create_profile(user.user_id).await?;
    Ok(Json(
        state
            .db
            .list_workouts(Some(profile.fitness_level), None)
            .await,
    ))
}
