// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;

/// Identifier of a user, as supplied by the auth layer.
pub type UserId = u64;

/// Identifier of a stored activity.
pub type ActivityId = u64;

/// Kind of workout logged by a user.
///
/// Tags the points table does not know about deserialize to `Other` and
/// score with its multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Running,
    Walking,
    Cycling,
    Swimming,
    StrengthTraining,
    Yoga,
    Sports,
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Running,
        ActivityType::Walking,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::StrengthTraining,
        ActivityType::Yoga,
        ActivityType::Sports,
        ActivityType::Other,
    ];

    /// Parse a wire tag, falling back to `Other` for anything unrecognized.
    pub fn from_tag(tag: &str) -> Self {
        Self::from_known_tag(tag).unwrap_or(ActivityType::Other)
    }

    /// Parse a wire tag exactly; `None` for tags outside the table.
    pub fn from_known_tag(tag: &str) -> Option<Self> {
        ActivityType::ALL.into_iter().find(|t| t.as_tag() == tag)
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Walking => "walking",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::StrengthTraining => "strength_training",
            ActivityType::Yoga => "yoga",
            ActivityType::Sports => "sports",
            ActivityType::Other => "other",
        }
    }
}

/// Stored activity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    /// Owning user
    pub user_id: UserId,
    pub activity_type: ActivityType,
    /// Duration in minutes
    pub duration: u32,
    /// Distance in km
    pub distance: Option<f64>,
    pub calories: Option<u32>,
    /// Always derived from `activity_type` and `duration`
    pub points_earned: u32,
    pub occurred_at: DateTime<Utc>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for logging a new activity.
///
/// Numeric fields are signed so that negative input reaches validation
/// instead of failing deserialization with an opaque message.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    #[validate(range(min = 0, message = "duration must not be negative"))]
    pub duration: i64,
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance: Option<f64>,
    #[validate(range(min = 0, message = "calories must not be negative"))]
    pub calories: Option<i64>,
    /// Defaults to now when omitted.
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: String,
}

/// Partial update of an existing activity. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityPatch {
    pub activity_type: Option<ActivityType>,
    #[validate(range(min = 0, message = "duration must not be negative"))]
    pub duration: Option<i64>,
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance: Option<f64>,
    #[validate(range(min = 0, message = "calories must not be negative"))]
    pub calories: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Activity fields after validation, ready for the points calculator.
#[derive(Debug, Clone)]
pub struct ValidatedActivity {
    pub activity_type: ActivityType,
    pub duration: u32,
    pub distance: Option<f64>,
    pub calories: Option<u32>,
    pub occurred_at: DateTime<Utc>,
    pub notes: String,
}

impl NewActivity {
    /// Validate field shapes and narrow numeric types.
    pub fn into_validated(self, now: DateTime<Utc>) -> Result<ValidatedActivity, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        check_distance(self.distance)?;

        Ok(ValidatedActivity {
            activity_type: self.activity_type,
            duration: narrow("duration", self.duration)?,
            distance: self.distance,
            calories: self.calories.map(|c| narrow("calories", c)).transpose()?,
            occurred_at: self.date.unwrap_or(now),
            notes: self.notes,
        })
    }
}

impl ActivityPatch {
    /// Apply this patch on top of a stored activity's fields.
    pub fn apply_to(self, current: &Activity) -> Result<ValidatedActivity, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        check_distance(self.distance)?;

        Ok(ValidatedActivity {
            activity_type: self.activity_type.unwrap_or(current.activity_type),
            duration: match self.duration {
                Some(d) => narrow("duration", d)?,
                None => current.duration,
            },
            distance: self.distance.or(current.distance),
            calories: match self.calories {
                Some(c) => Some(narrow("calories", c)?),
                None => current.calories,
            },
            occurred_at: self.date.unwrap_or(current.occurred_at),
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        })
    }
}

fn narrow(field: &str, value: i64) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| AppError::Validation(format!("{field} is out of range")))
}

fn check_distance(distance: Option<f64>) -> Result<(), AppError> {
    match distance {
        Some(d) if !d.is_finite() => Err(AppError::Validation(
            "distance must be a finite number".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Read-only filter over the activity store.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub user_id: Option<UserId>,
    pub activity_type: Option<ActivityType>,
    /// Inclusive lower bound on `occurred_at`
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `occurred_at`
    pub end: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        self.user_id.is_none_or(|u| activity.user_id == u)
            && self.activity_type.is_none_or(|t| activity.activity_type == t)
            && self.start.is_none_or(|s| activity.occurred_at >= s)
            && self.end.is_none_or(|e| activity.occurred_at <= e)
    }
}

/// Totals over one user's activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityAggregates {
    pub count: u32,
    /// Minutes
    pub total_duration: u64,
    /// Kilometers
    pub total_distance: f64,
    pub total_points: u64,
    pub total_calories: u64,
    /// Activity count per type; types with no activities are absent
    pub breakdown_by_type: BTreeMap<ActivityType, u32>,
}

impl ActivityAggregates {
    pub fn add(&mut self, activity: &Activity) {
        self.count += 1;
        self.total_duration += u64::from(activity.duration);
        self.total_distance += activity.distance.unwrap_or(0.0);
        self.total_points += u64::from(activity.points_earned);
        self.total_calories += u64::from(activity.calories.unwrap_or(0));
        *self
            .breakdown_by_type
            .entry(activity.activity_type)
            .or_insert(0) += 1;
    }
}
