// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod engine;
pub mod leaderboard;
pub mod points;
pub mod seed;

pub use engine::PointsEngine;
pub use leaderboard::LeaderboardBuilder;
pub use points::compute_points;
pub use seed::seed_demo_data;
