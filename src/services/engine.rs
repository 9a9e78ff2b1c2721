// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points engine: activity mutations and the aggregates derived from them.
//!
//! Every mutation runs the same chain inside one transaction:
//! 1. Stage the activity change (points computed by the calculator)
//! 2. Re-sum the owner's profile total from their activities
//! 3. Fan out to every team the owner belongs to and re-sum each team
//! 4. Commit everything at once
//!
//! The owner's user lock is held for the whole chain, and each affected
//! team's lock from the moment it is recomputed until commit. Totals are
//! always re-derived from source records, never patched with deltas.

use crate::db::{MemoryDb, Transaction};
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityId, ActivityPatch, NewActivity, NewTeam, Profile, ProfileUpdate, Team,
    TeamId, UserId, ValidatedActivity,
};
use crate::services::points::compute_points;
use chrono::{DateTime, Utc};
use tokio::sync::OwnedMutexGuard;
use validator::Validate;

/// Keeps profile and team totals consistent with the activity store.
#[derive(Clone)]
pub struct PointsEngine {
    db: MemoryDb,
}

impl PointsEngine {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &MemoryDb {
        &self.db
    }

    // ─── Activities ──────────────────────────────────────────────

    /// Log a new activity for `owner` and update every derived total.
    pub async fn create_activity(&self, owner: UserId, payload: NewActivity) -> Result<Activity> {
        let now = Utc::now();
        let fields = payload.into_validated(now)?;

        let _user_guard = self.db.lock_user(owner).await;
        let mut tx = self.db.begin();

        let activity = build_activity(self.db.next_id(), owner, fields, now);
        tx.put_activity(activity.clone());

        let profile = recompute_profile_in(&mut tx, owner, now).await?;
        let _team_guards = self.fan_out(&mut tx, owner, now).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = owner,
            activity_id = activity.id,
            activity_type = activity.activity_type.as_tag(),
            points = activity.points_earned,
            total_points = profile.total_points,
            "Activity logged"
        );

        Ok(activity)
    }

    /// Edit an activity. Points are recomputed only when the type or
    /// duration changes.
    pub async fn update_activity(
        &self,
        requester: UserId,
        activity_id: ActivityId,
        patch: ActivityPatch,
    ) -> Result<Activity> {
        let owner = self.owner_of(requester, activity_id).await?;
        let now = Utc::now();

        let _user_guard = self.db.lock_user(owner).await;
        let mut tx = self.db.begin();

        let current = tx
            .get_activity(activity_id)
            .await
            .ok_or_else(|| activity_not_found(activity_id))?;
        let fields = patch.apply_to(&current)?;

        let points_earned = if fields.activity_type != current.activity_type
            || fields.duration != current.duration
        {
            compute_points(fields.activity_type, fields.duration)
        } else {
            current.points_earned
        };

        let updated = Activity {
            activity_type: fields.activity_type,
            duration: fields.duration,
            distance: fields.distance,
            calories: fields.calories,
            points_earned,
            occurred_at: fields.occurred_at,
            notes: fields.notes,
            ..current
        };
        tx.put_activity(updated.clone());

        recompute_profile_in(&mut tx, owner, now).await?;
        let _team_guards = self.fan_out(&mut tx, owner, now).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = owner,
            activity_id,
            points = updated.points_earned,
            "Activity updated"
        );

        Ok(updated)
    }

    /// Remove an activity and take back its points.
    pub async fn delete_activity(&self, requester: UserId, activity_id: ActivityId) -> Result<()> {
        let owner = self.owner_of(requester, activity_id).await?;
        let now = Utc::now();

        let _user_guard = self.db.lock_user(owner).await;
        let mut tx = self.db.begin();

        // Re-check under the lock; a concurrent delete may have won.
        tx.get_activity(activity_id)
            .await
            .ok_or_else(|| activity_not_found(activity_id))?;
        tx.delete_activity(activity_id);

        let profile = recompute_profile_in(&mut tx, owner, now).await?;
        let _team_guards = self.fan_out(&mut tx, owner, now).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = owner,
            activity_id,
            total_points = profile.total_points,
            "Activity deleted"
        );

        Ok(())
    }

    /// Owner of an activity, as long as it is `requester`. Other users'
    /// activities are reported as missing.
    async fn owner_of(&self, requester: UserId, activity_id: ActivityId) -> Result<UserId> {
        match self.db.get_activity(activity_id).await {
            Some(activity) if activity.user_id == requester => Ok(activity.user_id),
            _ => Err(activity_not_found(activity_id)),
        }
    }

    // ─── Profiles ────────────────────────────────────────────────

    /// Fetch the user's profile, creating it on first access.
    pub async fn get_or_create_profile(&self, user_id: UserId) -> Result<Profile> {
        if let Some(profile) = self.db.get_profile(user_id).await {
            return Ok(profile);
        }

        let _user_guard = self.db.lock_user(user_id).await;
        let mut tx = self.db.begin();
        let profile = ensure_profile_in(&mut tx, user_id, Utc::now()).await?;
        tx.commit().await?;
        Ok(profile)
    }

    /// Apply a self-service profile edit. Points are untouched.
    pub async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<Profile> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let now = Utc::now();

        let _user_guard = self.db.lock_user(user_id).await;
        let mut tx = self.db.begin();
        let mut profile = ensure_profile_in(&mut tx, user_id, now).await?;
        update.apply(&mut profile, now);
        tx.put_profile(profile.clone());
        tx.commit().await?;
        Ok(profile)
    }

    /// Re-derive a user's total from their activities and propagate it to
    /// their teams. Idempotent.
    pub async fn recompute_profile(&self, user_id: UserId) -> Result<Profile> {
        let now = Utc::now();
        let _user_guard = self.db.lock_user(user_id).await;
        let mut tx = self.db.begin();
        let profile = recompute_profile_in(&mut tx, user_id, now).await?;
        let _team_guards = self.fan_out(&mut tx, user_id, now).await?;
        tx.commit().await?;
        Ok(profile)
    }

    // ─── Teams ───────────────────────────────────────────────────

    /// Create a team. A coach becomes its first member.
    pub async fn create_team(&self, coach: Option<UserId>, payload: NewTeam) -> Result<Team> {
        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be blank".to_string()));
        }
        let now = Utc::now();

        let _user_guard = match coach {
            Some(user_id) => Some(self.db.lock_user(user_id).await),
            None => None,
        };
        let team_id = self.db.next_id();
        let _team_guards = self.db.lock_teams(&[team_id]).await;
        let mut tx = self.db.begin();

        if let Some(user_id) = coach {
            ensure_profile_in(&mut tx, user_id, now).await?;
        }

        let team = Team {
            id: team_id,
            name,
            description: payload.description,
            coach,
            members: coach.into_iter().collect(),
            total_points: 0,
            avatar: payload.avatar,
            created_at: now,
            updated_at: now,
        };
        let team = recompute_team_in(&mut tx, team, now).await?;
        tx.commit().await?;

        tracing::info!(team_id, name = %team.name, coach = ?coach, "Team created");
        Ok(team)
    }

    /// Add `user_id` to a team.
    pub async fn join_team(&self, team_id: TeamId, user_id: UserId) -> Result<Team> {
        let now = Utc::now();
        let _user_guard = self.db.lock_user(user_id).await;
        let _team_guards = self.db.lock_teams(&[team_id]).await;
        let mut tx = self.db.begin();

        let mut team = tx.team(team_id).await.ok_or_else(|| team_not_found(team_id))?;
        if team.is_member(user_id) {
            return Err(AppError::AlreadyMember);
        }

        ensure_profile_in(&mut tx, user_id, now).await?;
        team.members.insert(user_id);
        let team = recompute_team_in(&mut tx, team, now).await?;
        tx.commit().await?;

        tracing::info!(team_id, user_id, total_points = team.total_points, "Joined team");
        Ok(team)
    }

    /// Remove `user_id` from a team. The coach cannot leave.
    pub async fn leave_team(&self, team_id: TeamId, user_id: UserId) -> Result<Team> {
        let now = Utc::now();
        let _user_guard = self.db.lock_user(user_id).await;
        let _team_guards = self.db.lock_teams(&[team_id]).await;
        let mut tx = self.db.begin();

        let mut team = tx.team(team_id).await.ok_or_else(|| team_not_found(team_id))?;
        if !team.is_member(user_id) {
            return Err(AppError::NotMember);
        }
        if team.coach == Some(user_id) {
            return Err(AppError::CoachCannotLeave);
        }

        team.members.remove(&user_id);
        let team = recompute_team_in(&mut tx, team, now).await?;
        tx.commit().await?;

        tracing::info!(team_id, user_id, total_points = team.total_points, "Left team");
        Ok(team)
    }

    /// Re-derive a team's total from its members' profiles. Idempotent.
    pub async fn recompute_team(&self, team_id: TeamId) -> Result<Team> {
        let _team_guards = self.db.lock_teams(&[team_id]).await;
        let mut tx = self.db.begin();
        let team = tx.team(team_id).await.ok_or_else(|| team_not_found(team_id))?;
        let team = recompute_team_in(&mut tx, team, Utc::now()).await?;
        tx.commit().await?;
        Ok(team)
    }

    /// Recompute every team containing `user_id`, locking each first.
    ///
    /// The returned guards must be held until the transaction commits.
    async fn fan_out(
        &self,
        tx: &mut Transaction,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<OwnedMutexGuard<()>>> {
        let team_ids = tx.team_ids_for_user(user_id).await;
        let guards = self.db.lock_teams(&team_ids).await;

        for team_id in &team_ids {
            let team = tx
                .team(*team_id)
                .await
                .ok_or_else(|| team_not_found(*team_id))?;
            let team = recompute_team_in(tx, team, now).await?;
            tracing::debug!(
                team_id,
                user_id,
                total_points = team.total_points,
                "Team total recomputed"
            );
        }

        Ok(guards)
    }
}

fn build_activity(
    id: ActivityId,
    owner: UserId,
    fields: ValidatedActivity,
    now: DateTime<Utc>,
) -> Activity {
    Activity {
        id,
        user_id: owner,
        activity_type: fields.activity_type,
        duration: fields.duration,
        distance: fields.distance,
        calories: fields.calories,
        points_earned: compute_points(fields.activity_type, fields.duration),
        occurred_at: fields.occurred_at,
        notes: fields.notes,
        created_at: now,
    }
}

/// Get-or-create the profile inside `tx`. A new profile starts from the
/// user's current activity total.
async fn ensure_profile_in(
    tx: &mut Transaction,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<Profile> {
    if let Some(profile) = tx.profile(user_id).await {
        return Ok(profile);
    }
    recompute_profile_in(tx, user_id, now).await
}

/// Stage `total_points = sum(points_earned)` for the user.
async fn recompute_profile_in(
    tx: &mut Transaction,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<Profile> {
    let mut profile = tx
        .profile(user_id)
        .await
        .unwrap_or_else(|| Profile::new(user_id, now));

    let total = tx.sum_points(user_id).await?;
    if profile.total_points != total {
        tracing::debug!(
            user_id,
            previous = profile.total_points,
            total,
            "Profile total recomputed"
        );
        profile.updated_at = now;
    }
    profile.total_points = total;

    tx.put_profile(profile.clone());
    Ok(profile)
}

/// Stage `total_points = sum(member profile totals)` for the team.
async fn recompute_team_in(tx: &mut Transaction, mut team: Team, now: DateTime<Utc>) -> Result<Team> {
    let mut total: u64 = 0;
    for member in &team.members {
        let member_points = tx.profile(*member).await.map_or(0, |p| p.total_points);
        total = total.checked_add(member_points).ok_or_else(|| {
            AppError::AggregationInconsistency(format!(
                "points total overflowed for team {}",
                team.id
            ))
        })?;
    }

    if team.total_points != total {
        team.updated_at = now;
    }
    team.total_points = total;

    tx.put_team(team.clone());
    Ok(team)
}

fn activity_not_found(activity_id: ActivityId) -> AppError {
    AppError::NotFound(format!("Activity {} not found", activity_id))
}

fn team_not_found(team_id: TeamId) -> AppError {
    AppError::NotFound(format!("Team {} not found", team_id))
}
