// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity points calculator.
//!
//! `points = floor(duration_minutes / 10) * multiplier(activity_type)`

use crate::models::ActivityType;

/// Minutes of activity that earn one multiplier's worth of points.
pub const MINUTES_PER_POINT_BLOCK: u32 = 10;

/// Fixed point weight per activity type.
pub fn multiplier(activity_type: ActivityType) -> u32 {
    match activity_type {
        ActivityType::Running => 3,
        ActivityType::Walking => 1,
        ActivityType::Cycling => 2,
        ActivityType::Swimming => 3,
        ActivityType::StrengthTraining => 2,
        ActivityType::Yoga => 1,
        ActivityType::Sports => 2,
        ActivityType::Other => 1,
    }
}

/// Points earned for an activity of the given type and duration.
pub fn compute_points(activity_type: ActivityType, duration_minutes: u32) -> u32 {
    (duration_minutes / MINUTES_PER_POINT_BLOCK) * multiplier(activity_type)
}
