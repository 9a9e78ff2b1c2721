// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OctoFit Tracker: activity logging, points, teams and leaderboards.
//!
//! This crate provides the backend API. Activities earn points; the points
//! engine keeps each user's profile total and each team's total consistent
//! with the activity store, and leaderboards rank those totals on demand.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MemoryDb;
use services::{LeaderboardBuilder, PointsEngine};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: MemoryDb,
    pub engine: PointsEngine,
    pub leaderboard: LeaderboardBuilder,
}

impl AppState {
    /// Wire the engine and leaderboard builder to one store.
    pub fn new(config: Config, db: MemoryDb) -> Self {
        Self {
            engine: PointsEngine::new(db.clone()),
            leaderboard: LeaderboardBuilder::new(db.clone()),
            config,
            db,
        }
    }
}
