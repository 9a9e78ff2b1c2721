// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team model for group competitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::models::UserId;

pub type TeamId = u64;

/// Stored team record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Unique across teams
    pub name: String,
    pub description: String,
    /// Coaching is a role, not a membership
    pub coach: Option<UserId>,
    pub members: BTreeSet<UserId>,
    /// Sum of current members' profile totals. Only the points engine writes this.
    pub total_points: u64,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }
}

/// Payload for creating a team.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}
