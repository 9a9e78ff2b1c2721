//! Workout suggestion catalog model.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, FitnessLevel};

pub type WorkoutId = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSuggestion {
    pub id: WorkoutId,
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub fitness_level: FitnessLevel,
    /// Suggested duration in minutes
    pub duration: u32,
    pub instructions: String,
    pub video_url: Option<String>,
}
