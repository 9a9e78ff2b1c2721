// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod challenge;
pub mod leaderboard;
pub mod profile;
pub mod team;
pub mod workout;

pub use activity::{
    Activity, ActivityAggregates, ActivityFilter, ActivityId, ActivityPatch, ActivityType,
    NewActivity, UserId, ValidatedActivity,
};
pub use challenge::{Challenge, ChallengeId, ChallengeType, NewChallenge};
pub use leaderboard::{LeaderboardEntry, TeamLeaderboardEntry};
pub use profile::{FitnessLevel, Profile, ProfileUpdate};
pub use team::{NewTeam, Team, TeamId};
pub use workout::{WorkoutId, WorkoutSuggestion};
