// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo data for local development: starter teams and the workout catalog.

use crate::db::MemoryDb;
use crate::error::Result;
use crate::models::{ActivityType, FitnessLevel, NewTeam, WorkoutSuggestion};
use crate::services::PointsEngine;

const DEMO_TEAMS: &[(&str, &str)] = &[
    ("Team Marvel", "Earth's mightiest step counters"),
    ("Team DC", "Justice, one lap at a time"),
];

/// (title, description, type, level, minutes, instructions)
const CATALOG: &[(&str, &str, ActivityType, FitnessLevel, u32, &str)] = &[
    (
        "Easy Neighborhood Walk",
        "Low-impact walk to build a daily habit",
        ActivityType::Walking,
        FitnessLevel::Beginner,
        30,
        "Walk at a pace where you can still hold a conversation.",
    ),
    (
        "Gentle Morning Yoga",
        "Mobility flow to start the day",
        ActivityType::Yoga,
        FitnessLevel::Beginner,
        20,
        "Sun salutations, cat-cow, child's pose. Breathe through each pose.",
    ),
    (
        "Couch to 5K: Week 3",
        "Run/walk intervals",
        ActivityType::Running,
        FitnessLevel::Beginner,
        25,
        "Alternate 90 seconds of running with 90 seconds of walking.",
    ),
    (
        "Tempo Run",
        "Sustained effort just below race pace",
        ActivityType::Running,
        FitnessLevel::Intermediate,
        40,
        "10 minute warm-up, 20 minutes at tempo, 10 minute cool-down.",
    ),
    (
        "Pool Endurance Set",
        "Continuous freestyle with short rests",
        ActivityType::Swimming,
        FitnessLevel::Intermediate,
        50,
        "10 x 100m freestyle, 20 seconds rest between repeats.",
    ),
    (
        "Hill Repeats on the Bike",
        "Climbing power intervals",
        ActivityType::Cycling,
        FitnessLevel::Intermediate,
        60,
        "6 x 4 minute climbs, easy spin back down.",
    ),
    (
        "Full Body Strength",
        "Compound lifts for strength and power",
        ActivityType::StrengthTraining,
        FitnessLevel::Advanced,
        75,
        "Squat, deadlift, bench press, pull-ups: 5 sets of 5.",
    ),
    (
        "Pickup Basketball Conditioning",
        "Court drills and scrimmage",
        ActivityType::Sports,
        FitnessLevel::Advanced,
        60,
        "Suicides, defensive slides, then full-court games to 21.",
    ),
];

/// What `seed_demo_data` created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: usize,
    pub workouts: usize,
}

/// Create demo teams (no coach, no members) and the workout catalog.
///
/// Teams whose names are already taken are skipped.
pub async fn seed_demo_data(engine: &PointsEngine, db: &MemoryDb) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for (name, description) in DEMO_TEAMS {
        let payload = NewTeam {
            name: (*name).to_string(),
            description: (*description).to_string(),
            avatar: None,
        };
        match engine.create_team(None, payload).await {
            Ok(_) => summary.teams += 1,
            Err(crate::error::AppError::Conflict(_)) => {
                tracing::debug!(name, "Demo team already exists");
            }
            Err(e) => return Err(e),
        }
    }

    for (title, description, activity_type, fitness_level, duration, instructions) in CATALOG {
        db.insert_workout(WorkoutSuggestion {
            id: db.next_id(),
            title: (*title).to_string(),
            description: (*description).to_string(),
            activity_type: *activity_type,
            fitness_level: *fitness_level,
            duration: *duration,
            instructions: (*instructions).to_string(),
            video_url: None,
        })
        .await;
        summary.workouts += 1;
    }

    tracing::info!(
        teams = summary.teams,
        workouts = summary.workouts,
        "Demo data seeded"
    );
    Ok(summary)
}
