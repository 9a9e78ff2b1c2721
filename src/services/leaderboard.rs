// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard builder.
//!
//! Leaderboards are projections of the current committed totals, built on
//! every call and never stored. Ordering is by `total_points` descending;
//! equal totals are ordered by ascending id so the output is deterministic.
//! Ranks are positions in that order (1, 2, 3, ...), even across ties.

use crate::db::MemoryDb;
use crate::models::{LeaderboardEntry, Profile, Team, TeamLeaderboardEntry, UserId};
use futures_util::{stream, StreamExt};
use std::collections::HashMap;

/// Per-user aggregate lookups run with at most this many in flight.
const MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Sort `items` for ranking and keep the first `limit`.
///
/// `key` yields `(total_points, id)`; higher points first, lower id first on ties.
pub fn rank_by_points<T, F>(mut items: Vec<T>, limit: usize, key: F) -> Vec<(u32, T)>
where
    F: Fn(&T) -> (u64, u64),
{
    items.sort_by(|a, b| {
        let (a_points, a_id) = key(a);
        let (b_points, b_id) = key(b);
        b_points.cmp(&a_points).then_with(|| a_id.cmp(&b_id))
    });
    items.truncate(limit);

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| (u32::try_from(i + 1).unwrap_or(u32::MAX), item))
        .collect()
}

/// Lowest-id team each user belongs to.
fn primary_team_names(teams: &[Team]) -> HashMap<UserId, String> {
    let mut primary = HashMap::new();
    for team in teams {
        for member in &team.members {
            primary.entry(*member).or_insert_with(|| team.name.clone());
        }
    }
    primary
}

/// Builds ranked user and team leaderboards from the store.
#[derive(Clone)]
pub struct LeaderboardBuilder {
    db: MemoryDb,
}

impl LeaderboardBuilder {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    /// Top `limit` users with their activity count, calories and primary team.
    pub async fn build_user_leaderboard(&self, limit: u32) -> Vec<LeaderboardEntry> {
        let profiles = self.db.all_profiles().await;
        let ranked = rank_by_points(profiles, limit as usize, |p: &Profile| {
            (p.total_points, p.user_id)
        });

        // Teams are listed in ascending id, so the first hit is the primary team.
        let teams = self.db.all_teams().await;
        let primary_teams = primary_team_names(&teams);

        let db = &self.db;
        let entries: Vec<LeaderboardEntry> = stream::iter(ranked)
            .map(|(rank, profile)| {
                let team_name = primary_teams.get(&profile.user_id).cloned();
                async move {
                    let aggregates = db.aggregates_for(profile.user_id).await;
                    LeaderboardEntry {
                        user_id: profile.user_id,
                        display_name: profile.display_name,
                        total_points: profile.total_points,
                        activity_count: aggregates.count,
                        total_calories: aggregates.total_calories,
                        team_name,
                        rank,
                    }
                }
            })
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;

        tracing::debug!(limit, entries = entries.len(), "User leaderboard built");
        entries
    }

    /// Top `limit` teams by total points.
    pub async fn build_team_leaderboard(&self, limit: u32) -> Vec<TeamLeaderboardEntry> {
        let teams = self.db.all_teams().await;

        let entries: Vec<TeamLeaderboardEntry> =
            rank_by_points(teams, limit as usize, |t: &Team| (t.total_points, t.id))
                .into_iter()
                .map(|(rank, team)| TeamLeaderboardEntry {
                    team_id: team.id,
                    member_count: u32::try_from(team.members.len()).unwrap_or(u32::MAX),
                    team_name: team.name,
                    total_points: team.total_points,
                    rank,
                })
                .collect();

        tracing::debug!(limit, entries = entries.len(), "Team leaderboard built");
        entries
    }
}
