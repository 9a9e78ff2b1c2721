// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FitnessLevel, Profile, ProfileUpdate, UserId};
use crate::routes::ApiJson;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profiles/me", get(get_me).patch(update_me))
        .route("/api/profiles/{user_id}", get(get_profile))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub display_name: Option<String>,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fitness_level: FitnessLevel,
    pub avatar: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            user_id: p.user_id,
            display_name: p.display_name,
            age: p.age,
            height: p.height,
            weight: p.weight,
            fitness_level: p.fitness_level,
            avatar: p.avatar,
            total_points: p.total_points,
            created_at: format_utc_rfc3339(p.created_at),
            updated_at: format_utc_rfc3339(p.updated_at),
        }
    }
}

/// Current user's profile, created on first access.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.engine.get_or_create_profile(user.user_id).await?;
    Ok(Json(profile.into()))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.engine.update_profile(user.user_id, update).await?;
    tracing::debug!(user_id = user.user_id, "Profile updated");
    Ok(Json(profile.into()))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_profile(user_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))?;
    Ok(Json(profile.into()))
}
