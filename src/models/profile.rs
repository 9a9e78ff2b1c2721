//! User profile model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::UserId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Per-user profile. Exactly one per user, created lazily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub age: Option<u32>,
    /// Height in cm
    pub height: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub fitness_level: FitnessLevel,
    pub avatar: Option<String>,
    /// Sum of `points_earned` over the user's activities. Only the points
    /// engine writes this.
    pub total_points: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display_name: None,
            age: None,
            height: None,
            weight: None,
            fitness_level: FitnessLevel::default(),
            avatar: None,
            total_points: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Self-service profile edit. `total_points` is not editable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(range(max = 150))]
    pub age: Option<u32>,
    #[validate(range(min = 0.0, max = 300.0))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight: Option<f64>,
    pub fitness_level: Option<FitnessLevel>,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut Profile, now: DateTime<Utc>) {
        if let Some(name) = self.display_name {
            profile.display_name = Some(name);
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(height) = self.height {
            profile.height = Some(height);
        }
        if let Some(weight) = self.weight {
            profile.weight = Some(weight);
        }
        if let Some(level) = self.fitness_level {
            profile.fitness_level = level;
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = Some(avatar);
        }
        profile.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_ignores_points_field() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"fitness_level": "advanced", "total_points": 9999}"#)
                .unwrap();

        let now = Utc::now();
        let mut profile = Profile::new(1, now);
        update.apply(&mut profile, now);

        assert_eq!(profile.fitness_level, FitnessLevel::Advanced);
        assert_eq!(profile.total_points, 0);
    }

    #[test]
    fn test_update_rejects_absurd_age() {
        let update = ProfileUpdate {
            age: Some(400),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
