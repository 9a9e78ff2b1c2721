// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge routes. Rewards are informational and never touch point totals.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityType, Challenge, ChallengeId, ChallengeType, NewChallenge};
use crate::routes::ApiJson;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/challenges", get(list_challenges).post(create_challenge))
        .route("/api/challenges/mine", get(my_challenges))
        .route("/api/challenges/{id}", get(get_challenge))
        .route("/api/challenges/{id}/join", post(join_challenge))
        .route("/api/challenges/{id}/leave", post(leave_challenge))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChallengeResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub title: String,
    pub description: String,
    pub challenge_type: ChallengeType,
    pub target_value: f64,
    pub activity_types: Vec<ActivityType>,
    pub start_date: String,
    pub end_date: String,
    pub points_reward: u32,
    pub participant_count: u32,
    pub is_active: bool,
    pub is_participating: bool,
}

impl ChallengeResponse {
    fn new(c: Challenge, viewer: u64, now: DateTime<Utc>) -> Self {
        Self {
            is_active: c.is_active(now),
            is_participating: c.participants.contains(&viewer),
            participant_count: u32::try_from(c.participants.len()).unwrap_or(u32::MAX),
            id: c.id,
            title: c.title,
            description: c.description,
            challenge_type: c.challenge_type,
            target_value: c.target_value,
            activity_types: c.activity_types,
            start_date: format_utc_rfc3339(c.start_date),
            end_date: format_utc_rfc3339(c.end_date),
            points_reward: c.points_reward,
        }
    }
}

#[derive(Deserialize)]
struct ChallengesQuery {
    #[serde(default)]
    active: bool,
}

async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ChallengesQuery>,
) -> Json<Vec<ChallengeResponse>> {
    let now = Utc::now();
    let challenges = state
        .db
        .list_challenges(params.active.then_some(now))
        .await;
    Json(
        challenges
            .into_iter()
            .map(|c| ChallengeResponse::new(c, user.user_id, now))
            .collect(),
    )
}

async fn create_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NewChallenge>,
) -> Result<(StatusCode, Json<ChallengeResponse>)> {
    payload.check()?;
    let now = Utc::now();

    let challenge = Challenge {
        id: state.db.next_id(),
        title: payload.title,
        description: payload.description,
        challenge_type: payload.challenge_type,
        target_value: payload.target_value,
        activity_types: payload.activity_types,
        start_date: payload.start_date,
        end_date: payload.end_date,
        points_reward: payload.points_reward,
        participants: Default::default(),
        created_at: now,
    };
    state.db.insert_challenge(challenge.clone()).await;

    tracing::info!(
        challenge_id = challenge.id,
        created_by = user.user_id,
        "Challenge created"
    );
    Ok((
        StatusCode::CREATED,
        Json(ChallengeResponse::new(challenge, user.user_id, now)),
    ))
}

async fn my_challenges(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<ChallengeResponse>> {
    let now = Utc::now();
    let challenges = state.db.challenges_for_user(user.user_id).await;
    Json(
        challenges
            .into_iter()
            .map(|c| ChallengeResponse::new(c, user.user_id, now))
            .collect(),
    )
}

async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(challenge_id): Path<ChallengeId>,
) -> Result<Json<ChallengeResponse>> {
    let challenge = state
        .db
        .get_challenge(challenge_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Challenge {} not found", challenge_id)))?;
    Ok(Json(ChallengeResponse::new(
        challenge,
        user.user_id,
        Utc::now(),
    )))
}

async fn join_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(challenge_id): Path<ChallengeId>,
) -> Result<Json<ChallengeResponse>> {
    let challenge = state.db.join_challenge(challenge_id, user.user_id).await?;
    tracing::info!(challenge_id, user_id = user.user_id, "Joined challenge");
    Ok(Json(ChallengeResponse::new(
        challenge,
        user.user_id,
        Utc::now(),
    )))
}

async fn leave_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(challenge_id): Path<ChallengeId>,
) -> Result<Json<ChallengeResponse>> {
    let challenge = state.db.leave_challenge(challenge_id, user.user_id).await?;
    tracing::info!(challenge_id, user_id = user.user_id, "Left challenge");
    Ok(Json(ChallengeResponse::new(
        challenge,
        user.user_id,
        Utc::now(),
    )))
}
