// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness challenge model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::{ActivityType, UserId};

pub type ChallengeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ChallengeType {
    Distance,
    Duration,
    Frequency,
    Points,
}

/// Stored challenge record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub challenge_type: ChallengeType,
    pub target_value: f64,
    /// Empty means any activity type counts
    pub activity_types: Vec<ActivityType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub points_reward: u32,
    pub participants: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    /// Whether `now` falls inside the challenge window (inclusive).
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

/// Payload for creating a challenge.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewChallenge {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub challenge_type: ChallengeType,
    #[validate(range(exclusive_min = 0.0))]
    pub target_value: f64,
    #[serde(default)]
    pub activity_types: Vec<ActivityType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub points_reward: u32,
}

impl NewChallenge {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if self.end_date < self.start_date {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn challenge(start: DateTime<Utc>, end: DateTime<Utc>) -> NewChallenge {
        NewChallenge {
            title: "10k steps".to_string(),
            description: String::new(),
            challenge_type: ChallengeType::Frequency,
            target_value: 10.0,
            activity_types: vec![ActivityType::Walking],
            start_date: start,
            end_date: end,
            points_reward: 50,
        }
    }

    #[test]
    fn test_inverted_window_rejected() {
        let now = Utc::now();
        let err = challenge(now, now - Duration::days(1)).check().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_zero_target_rejected() {
        let now = Utc::now();
        let mut c = challenge(now, now + Duration::days(7));
        c.target_value = 0.0;
        assert!(c.check().is_err());
    }

    #[test]
    fn test_is_active_bounds_inclusive() {
        let now = Utc::now();
        let stored = Challenge {
            id: 1,
            title: "t".to_string(),
            description: String::new(),
            challenge_type: ChallengeType::Points,
            target_value: 100.0,
            activity_types: vec![],
            start_date: now,
            end_date: now + Duration::days(1),
            points_reward: 0,
            participants: BTreeSet::new(),
            created_at: now,
        };

        assert!(stored.is_active(now));
        assert!(stored.is_active(now + Duration::days(1)));
        assert!(!stored.is_active(now - Duration::seconds(1)));
    }
}
