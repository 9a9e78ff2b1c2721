// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard rows. Built at read time and never stored.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{TeamId, UserId};

/// One ranked user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: UserId,
    pub display_name: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub activity_count: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
    /// Name of the user's primary team (lowest team id), if any
    pub team_name: Option<String>,
    pub rank: u32,
}

/// One ranked team.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamLeaderboardEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub team_id: TeamId,
    pub team_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: u64,
    pub member_count: u32,
    pub rank: u32,
}
