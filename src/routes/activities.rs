// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging, listing and summary routes.

use crate::db::ActivityQueryCursor;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, ActivityFilter, ActivityPatch, ActivityType, NewActivity, UserId};
use crate::routes::ApiJson;
use crate::time_utils::{format_utc_rfc3339, parse_rfc3339_param};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Activity routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/summary", get(get_summary))
        .route(
            "/api/activities/{id}",
            get(get_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub activity_type: ActivityType,
    pub duration: u32,
    pub distance: Option<f64>,
    pub calories: Option<u32>,
    pub points_earned: u32,
    pub date: String,
    pub notes: String,
    pub created_at: String,
}

impl From<Activity> for ActivityResponse {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            activity_type: a.activity_type,
            duration: a.duration,
            distance: a.distance,
            calories: a.calories,
            points_earned: a.points_earned,
            date: format_utc_rfc3339(a.occurred_at),
            notes: a.notes,
            created_at: format_utc_rfc3339(a.created_at),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityResponse>,
    pub per_page: u32,
    pub next_cursor: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummaryResponse {
    pub count: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
    pub total_distance: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
    pub breakdown_by_type: BTreeMap<ActivityType, u32>,
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Owner to list; defaults to the caller
    user: Option<UserId>,
    activity_type: Option<String>,
    /// Inclusive lower bound (RFC3339)
    start_date: Option<String>,
    /// Inclusive upper bound (RFC3339)
    end_date: Option<String>,
    /// Opaque token from a previous page's `next_cursor`.
    cursor: Option<String>,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;
const CURSOR_PARTS: usize = 3;

/// Filter tags must name a known activity type.
pub(crate) fn parse_activity_type(tag: &str) -> Result<ActivityType> {
    ActivityType::from_known_tag(tag)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown activity_type '{}'", tag)))
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<ActivityQueryCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor = || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            let parts: Vec<&str> = decoded_str.split(':').collect();
            if parts.len() != CURSOR_PARTS {
                return Err(invalid_cursor());
            }

            let seconds = parts[0].parse::<i64>().map_err(|_| invalid_cursor())?;
            let nanos = parts[1].parse::<u32>().map_err(|_| invalid_cursor())?;
            let activity_id = parts[2].parse::<u64>().map_err(|_| invalid_cursor())?;
            let occurred_at =
                chrono::DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid_cursor)?;

            Ok(ActivityQueryCursor {
                occurred_at,
                activity_id,
            })
        })
        .transpose()
}

fn encode_cursor(cursor: ActivityQueryCursor) -> String {
    let payload = format!(
        "{}:{}:{}",
        cursor.occurred_at.timestamp(),
        cursor.occurred_at.timestamp_subsec_nanos(),
        cursor.activity_id
    );
    URL_SAFE_NO_PAD.encode(payload)
}

/// List activities, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    tracing::debug!(
        user_id = user.user_id,
        owner = ?params.user,
        activity_type = ?params.activity_type,
        cursor = ?params.cursor,
        "Fetching activities"
    );

    if params.per_page == 0 {
        return Err(AppError::BadRequest(
            "per_page must be greater than 0".to_string(),
        ));
    }
    let limit = params.per_page.min(MAX_PER_PAGE);

    let filter = ActivityFilter {
        user_id: Some(params.user.unwrap_or(user.user_id)),
        activity_type: params
            .activity_type
            .as_deref()
            .map(parse_activity_type)
            .transpose()?,
        start: parse_rfc3339_param("start_date", params.start_date.as_deref())?,
        end: parse_rfc3339_param("end_date", params.end_date.as_deref())?,
    };
    let cursor = parse_cursor(params.cursor.as_deref())?;

    // Fetch one extra item to determine if another page is available.
    let mut results = state
        .db
        .list_activities(&filter, cursor, limit.saturating_add(1))
        .await;

    let has_more = results.len() > limit as usize;
    if has_more {
        results.truncate(limit as usize);
    }

    let next_cursor = if has_more {
        results.last().map(|last| {
            encode_cursor(ActivityQueryCursor {
                occurred_at: last.occurred_at,
                activity_id: last.id,
            })
        })
    } else {
        None
    };

    Ok(Json(ActivitiesResponse {
        activities: results.into_iter().map(ActivityResponse::from).collect(),
        per_page: limit,
        next_cursor,
    }))
}

/// Aggregates over the caller's activities.
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<ActivitySummaryResponse> {
    let aggregates = state.db.aggregates_for(user.user_id).await;

    Json(ActivitySummaryResponse {
        count: aggregates.count,
        total_duration: aggregates.total_duration,
        total_distance: aggregates.total_distance,
        total_points: aggregates.total_points,
        total_calories: aggregates.total_calories,
        breakdown_by_type: aggregates.breakdown_by_type,
    })
}

// ─── Single activity ─────────────────────────────────────────

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NewActivity>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    let activity = state.engine.create_activity(user.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(activity.into())))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivityResponse>> {
    // Other users' activities read as missing.
    let activity = state
        .db
        .get_activity(activity_id)
        .await
        .filter(|activity| activity.user_id == user.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

    Ok(Json(activity.into()))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
    ApiJson(patch): ApiJson<ActivityPatch>,
) -> Result<Json<ActivityResponse>> {
    let activity = state
        .engine
        .update_activity(user.user_id, activity_id, patch)
        .await?;
    Ok(Json(activity.into()))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
) -> Result<StatusCode> {
    state
        .engine
        .delete_activity(user.user_id, activity_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
