// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory transactional store.
//!
//! Committed state sits behind one `RwLock`; readers only ever see committed
//! snapshots. Writers stage changes in a [`Transaction`] and publish them in a
//! single write-locked commit, so an activity and every aggregate derived
//! from it become visible together or not at all.
//!
//! Read-modify-write of a derived total is serialized per entity through the
//! user and team lock tables. Lock order is: one user lock, then team locks
//! in ascending id.

use crate::error::AppError;
use crate::models::{
    Activity, ActivityAggregates, ActivityFilter, ActivityId, ActivityType, Challenge,
    ChallengeId, FitnessLevel, Profile, Team, TeamId, UserId, WorkoutId, WorkoutSuggestion,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Per-entity mutexes keyed by id.
pub type EntityLocks = DashMap<u64, Arc<Mutex<()>>>;

/// Position in the activity listing (`occurred_at` desc, then id desc).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityQueryCursor {
    pub occurred_at: DateTime<Utc>,
    pub activity_id: ActivityId,
}

#[derive(Default)]
struct Tables {
    activities: BTreeMap<ActivityId, Activity>,
    activities_by_user: HashMap<UserId, BTreeSet<ActivityId>>,
    profiles: BTreeMap<UserId, Profile>,
    teams: BTreeMap<TeamId, Team>,
    challenges: BTreeMap<ChallengeId, Challenge>,
    workouts: BTreeMap<WorkoutId, WorkoutSuggestion>,
}

impl Tables {
    fn user_activities(&self, user_id: UserId) -> impl Iterator<Item = &Activity> {
        self.activities_by_user
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.activities.get(id))
    }

    fn insert_activity(&mut self, activity: Activity) {
        if let Some(previous) = self.activities.get(&activity.id) {
            if previous.user_id != activity.user_id {
                let previous_owner = previous.user_id;
                self.unindex(previous_owner, activity.id);
            }
        }
        self.activities_by_user
            .entry(activity.user_id)
            .or_default()
            .insert(activity.id);
        self.activities.insert(activity.id, activity);
    }

    fn remove_activity(&mut self, id: ActivityId) {
        if let Some(removed) = self.activities.remove(&id) {
            self.unindex(removed.user_id, id);
        }
    }

    fn unindex(&mut self, user_id: UserId, id: ActivityId) {
        if let Some(ids) = self.activities_by_user.get_mut(&user_id) {
            ids.remove(&id);
            if ids.is_empty() {
                self.activities_by_user.remove(&user_id);
            }
        }
    }
}

struct Inner {
    tables: RwLock<Tables>,
    next_id: AtomicU64,
    user_locks: EntityLocks,
    team_locks: EntityLocks,
}

/// Shared handle to the store. Cheap to clone.
#[derive(Clone)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl Default for MemoryDb {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDb {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                tables: RwLock::new(Tables::default()),
                next_id: AtomicU64::new(1),
                user_locks: DashMap::new(),
                team_locks: DashMap::new(),
            }),
        }
    }

    /// Allocate a fresh id. Ids are unique across all record kinds.
    pub fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // ─── Locking ─────────────────────────────────────────────────

    /// Serialize aggregate writes for one user.
    pub async fn lock_user(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        lock_entity(&self.inner.user_locks, user_id).await
    }

    /// Serialize aggregate writes for a set of teams, acquired in ascending id.
    pub async fn lock_teams(&self, team_ids: &[TeamId]) -> Vec<OwnedMutexGuard<()>> {
        let ordered: BTreeSet<TeamId> = team_ids.iter().copied().collect();
        let mut guards = Vec::with_capacity(ordered.len());
        for team_id in ordered {
            guards.push(lock_entity(&self.inner.team_locks, team_id).await);
        }
        guards
    }

    /// Start staging writes.
    pub fn begin(&self) -> Transaction {
        Transaction {
            db: self.clone(),
            activities: BTreeMap::new(),
            profiles: BTreeMap::new(),
            teams: BTreeMap::new(),
        }
    }

    // ─── Activity Operations ─────────────────────────────────────

    pub async fn get_activity(&self, activity_id: ActivityId) -> Option<Activity> {
        self.inner
            .tables
            .read()
            .await
            .activities
            .get(&activity_id)
            .cloned()
    }

    /// Activities matching `filter`, newest first, starting after `cursor`.
    pub async fn list_activities(
        &self,
        filter: &ActivityFilter,
        cursor: Option<ActivityQueryCursor>,
        limit: u32,
    ) -> Vec<Activity> {
        let tables = self.inner.tables.read().await;

        let mut matching: Vec<&Activity> = match filter.user_id {
            Some(user_id) => tables
                .user_activities(user_id)
                .filter(|a| filter.matches(a))
                .collect(),
            None => tables
                .activities
                .values()
                .filter(|a| filter.matches(a))
                .collect(),
        };

        matching.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        matching
            .into_iter()
            .filter(|a| {
                cursor.is_none_or(|c| (a.occurred_at, a.id) < (c.occurred_at, c.activity_id))
            })
            .take(limit as usize)
            .cloned()
            .collect()
    }

    /// Sum of `points_earned` across the user's committed activities.
    pub async fn sum_points(&self, user_id: UserId) -> Result<u64, AppError> {
        let tables = self.inner.tables.read().await;
        checked_points_sum(user_id, tables.user_activities(user_id))
    }

    /// Count, duration, distance, points, calories and per-type breakdown.
    pub async fn aggregates_for(&self, user_id: UserId) -> ActivityAggregates {
        let tables = self.inner.tables.read().await;
        let mut aggregates = ActivityAggregates::default();
        for activity in tables.user_activities(user_id) {
            aggregates.add(activity);
        }
        aggregates
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn get_profile(&self, user_id: UserId) -> Option<Profile> {
        self.inner
            .tables
            .read()
            .await
            .profiles
            .get(&user_id)
            .cloned()
    }

    /// Snapshot of every profile, in ascending user id.
    pub async fn all_profiles(&self) -> Vec<Profile> {
        self.inner
            .tables
            .read()
            .await
            .profiles
            .values()
            .cloned()
            .collect()
    }

    // ─── Team Operations ─────────────────────────────────────────

    pub async fn get_team(&self, team_id: TeamId) -> Option<Team> {
        self.inner.tables.read().await.teams.get(&team_id).cloned()
    }

    /// Snapshot of every team, in ascending team id.
    pub async fn all_teams(&self) -> Vec<Team> {
        self.inner
            .tables
            .read()
            .await
            .teams
            .values()
            .cloned()
            .collect()
    }

    /// Teams the user belongs to, in ascending team id.
    pub async fn teams_for_user(&self, user_id: UserId) -> Vec<Team> {
        self.inner
            .tables
            .read()
            .await
            .teams
            .values()
            .filter(|t| t.is_member(user_id))
            .cloned()
            .collect()
    }

    // ─── Challenge Operations ────────────────────────────────────

    pub async fn insert_challenge(&self, challenge: Challenge) {
        self.inner
            .tables
            .write()
            .await
            .challenges
            .insert(challenge.id, challenge);
    }

    pub async fn get_challenge(&self, challenge_id: ChallengeId) -> Option<Challenge> {
        self.inner
            .tables
            .read()
            .await
            .challenges
            .get(&challenge_id)
            .cloned()
    }

    /// Challenges newest start first, optionally only those active at `active_at`.
    pub async fn list_challenges(&self, active_at: Option<DateTime<Utc>>) -> Vec<Challenge> {
        let tables = self.inner.tables.read().await;
        let mut challenges: Vec<Challenge> = tables
            .challenges
            .values()
            .filter(|c| active_at.is_none_or(|now| c.is_active(now)))
            .cloned()
            .collect();
        challenges.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        challenges
    }

    pub async fn challenges_for_user(&self, user_id: UserId) -> Vec<Challenge> {
        let tables = self.inner.tables.read().await;
        tables
            .challenges
            .values()
            .filter(|c| c.participants.contains(&user_id))
            .cloned()
            .collect()
    }

    pub async fn join_challenge(
        &self,
        challenge_id: ChallengeId,
        user_id: UserId,
    ) -> Result<Challenge, AppError> {
        let mut tables = self.inner.tables.write().await;
        let challenge = tables
            .challenges
            .get_mut(&challenge_id)
            .ok_or_else(|| AppError::NotFound(format!("Challenge {} not found", challenge_id)))?;

        if !challenge.participants.insert(user_id) {
            return Err(AppError::AlreadyParticipating);
        }
        Ok(challenge.clone())
    }

    pub async fn leave_challenge(
        &self,
        challenge_id: ChallengeId,
        user_id: UserId,
    ) -> Result<Challenge, AppError> {
        let mut tables = self.inner.tables.write().await;
        let challenge = tables
            .challenges
            .get_mut(&challenge_id)
            .ok_or_else(|| AppError::NotFound(format!("Challenge {} not found", challenge_id)))?;

        if !challenge.participants.remove(&user_id) {
            return Err(AppError::NotParticipating);
        }
        Ok(challenge.clone())
    }

    // ─── Workout Catalog ─────────────────────────────────────────

    pub async fn insert_workout(&self, workout: WorkoutSuggestion) {
        self.inner
            .tables
            .write()
            .await
            .workouts
            .insert(workout.id, workout);
    }

    pub async fn get_workout(&self, workout_id: WorkoutId) -> Option<WorkoutSuggestion> {
        self.inner
            .tables
            .read()
            .await
            .workouts
            .get(&workout_id)
            .cloned()
    }

    pub async fn list_workouts(
        &self,
        fitness_level: Option<FitnessLevel>,
        activity_type: Option<ActivityType>,
    ) -> Vec<WorkoutSuggestion> {
        self.inner
            .tables
            .read()
            .await
            .workouts
            .values()
            .filter(|w| fitness_level.is_none_or(|l| w.fitness_level == l))
            .filter(|w| activity_type.is_none_or(|t| w.activity_type == t))
            .cloned()
            .collect()
    }
}

async fn lock_entity(locks: &EntityLocks, id: u64) -> OwnedMutexGuard<()> {
    let lock = locks
        .entry(id)
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone();
    lock.lock_owned().await
}

fn checked_points_sum<'a>(
    user_id: UserId,
    mut activities: impl Iterator<Item = &'a Activity>,
) -> Result<u64, AppError> {
    activities.try_fold(0u64, |total, a| {
        total
            .checked_add(u64::from(a.points_earned))
            .ok_or_else(|| {
                AppError::AggregationInconsistency(format!(
                    "points total overflowed for user {}",
                    user_id
                ))
            })
    })
}

/// Staged writes over the committed state.
///
/// Reads through a transaction see its own staged writes. Dropping a
/// transaction without committing discards everything it staged.
pub struct Transaction {
    db: MemoryDb,
    /// `None` marks a staged delete
    activities: BTreeMap<ActivityId, Option<Activity>>,
    profiles: BTreeMap<UserId, Profile>,
    teams: BTreeMap<TeamId, Team>,
}

impl Transaction {
    pub fn put_activity(&mut self, activity: Activity) {
        self.activities.insert(activity.id, Some(activity));
    }

    pub fn delete_activity(&mut self, activity_id: ActivityId) {
        self.activities.insert(activity_id, None);
    }

    pub fn put_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.user_id, profile);
    }

    pub fn put_team(&mut self, team: Team) {
        self.teams.insert(team.id, team);
    }

    pub async fn get_activity(&self, activity_id: ActivityId) -> Option<Activity> {
        match self.activities.get(&activity_id) {
            Some(staged) => staged.clone(),
            None => self.db.get_activity(activity_id).await,
        }
    }

    pub async fn profile(&self, user_id: UserId) -> Option<Profile> {
        match self.profiles.get(&user_id) {
            Some(staged) => Some(staged.clone()),
            None => self.db.get_profile(user_id).await,
        }
    }

    pub async fn team(&self, team_id: TeamId) -> Option<Team> {
        match self.teams.get(&team_id) {
            Some(staged) => Some(staged.clone()),
            None => self.db.get_team(team_id).await,
        }
    }

    /// Sum of `points_earned` over the user's activities as this
    /// transaction would leave them.
    pub async fn sum_points(&self, user_id: UserId) -> Result<u64, AppError> {
        let tables = self.db.inner.tables.read().await;

        let committed = tables
            .user_activities(user_id)
            .filter(|a| !self.activities.contains_key(&a.id));
        let staged = self
            .activities
            .values()
            .flatten()
            .filter(|a| a.user_id == user_id);

        checked_points_sum(user_id, committed.chain(staged))
    }

    /// Ids of the teams the user belongs to, staged membership included.
    pub async fn team_ids_for_user(&self, user_id: UserId) -> Vec<TeamId> {
        let tables = self.db.inner.tables.read().await;

        let mut ids: BTreeSet<TeamId> = tables
            .teams
            .values()
            .filter(|t| !self.teams.contains_key(&t.id) && t.is_member(user_id))
            .map(|t| t.id)
            .collect();
        ids.extend(
            self.teams
                .values()
                .filter(|t| t.is_member(user_id))
                .map(|t| t.id),
        );
        ids.into_iter().collect()
    }

    /// Publish all staged writes at once.
    ///
    /// Fails without applying anything if a staged team would duplicate
    /// another team's name.
    pub async fn commit(self) -> Result<(), AppError> {
        let mut tables = self.db.inner.tables.write().await;

        for team in self.teams.values() {
            let clash = tables
                .teams
                .values()
                .chain(self.teams.values())
                .any(|other| other.id != team.id && other.name == team.name);
            if clash {
                return Err(AppError::Conflict(format!(
                    "Team name '{}' is already taken",
                    team.name
                )));
            }
        }

        for (id, staged) in self.activities {
            match staged {
                Some(activity) => tables.insert_activity(activity),
                None => tables.remove_activity(id),
            }
        }
        tables.profiles.extend(self.profiles);
        tables.teams.extend(self.teams);

        Ok(())
    }
}
