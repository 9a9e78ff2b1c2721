// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team routes: create, browse, join and leave.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{NewTeam, Team, TeamId};
use crate::services::leaderboard::rank_by_points;
use crate::routes::ApiJson;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route("/api/teams/mine", get(my_teams))
        .route("/api/teams/{id}", get(get_team))
        .route("/api/teams/{id}/join", post(join_team))
        .route("/api/teams/{id}/leave", post(leave_team))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub coach: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number[]"))]
    pub members: Vec<u64>,
    pub member_count: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Team> for TeamResponse {
    fn from(t: Team) -> Self {
        Self {
            id: t.id,
            member_count: u32::try_from(t.members.len()).unwrap_or(u32::MAX),
            members: t.members.into_iter().collect(),
            name: t.name,
            description: t.description,
            coach: t.coach,
            total_points: t.total_points,
            avatar: t.avatar,
            created_at: format_utc_rfc3339(t.created_at),
            updated_at: format_utc_rfc3339(t.updated_at),
        }
    }
}

/// All teams, highest total first.
async fn list_teams(State(state): State<Arc<AppState>>) -> Json<Vec<TeamResponse>> {
    let teams = state.db.all_teams().await;
    let count = teams.len();
    let ranked = rank_by_points(teams, count, |t: &Team| (t.total_points, t.id));
    Json(ranked.into_iter().map(|(_, t)| t.into()).collect())
}

/// Create a team with the caller as coach.
async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NewTeam>,
) -> Result<(StatusCode, Json<TeamResponse>)> {
    let team = state.engine.create_team(Some(user.user_id), payload).await?;
    Ok((StatusCode::CREATED, Json(team.into())))
}

async fn my_teams(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<TeamResponse>> {
    let teams = state.db.teams_for_user(user.user_id).await;
    Json(teams.into_iter().map(TeamResponse::from).collect())
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<TeamResponse>> {
    let team = state
        .db
        .get_team(team_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;
    Ok(Json(team.into()))
}

async fn join_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<TeamResponse>> {
    let team = state.engine.join_team(team_id, user.user_id).await?;
    Ok(Json(team.into()))
}

async fn leave_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<TeamResponse>> {
    let team = state.engine.leave_team(team_id, user.user_id).await?;
    Ok(Json(team.into()))
}
