// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote per-user document store.
//!
//! Layout:
//! - `users/{uid}`: profile fields, `setup_complete`, `createdAt`
//! - `users/{uid}/settings/goals`: the three goal fields
//! - `users/{uid}/daily_stats/{yyyy-MM-dd}`: one document per day
//!
//! Every write replaces the whole document.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{DailyMetrics, Goals, Profile};
use crate::time_utils::{date_key, parse_date_key};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Root profile document at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub name: String,
    pub age: u32,
    pub height: u32,
    pub weight: f32,
    pub gender: String,
    #[serde(default)]
    pub setup_complete: bool,
    /// Milliseconds since the epoch, rewritten on every profile push.
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

impl ProfileDocument {
    /// Document for a completed profile stamped at `created_at`.
    pub fn completed(profile: &Profile, created_at: i64) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age,
            height: profile.height,
            weight: profile.weight,
            gender: profile.gender.clone(),
            setup_complete: true,
            created_at,
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            age: self.age,
            height: self.height,
            weight: self.weight,
            gender: self.gender.clone(),
        }
    }
}

/// Goals document at `users/{uid}/settings/goals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsDocument {
    pub goal_steps: u32,
    pub goal_calories: u32,
    pub goal_active_time: u32,
}

impl From<Goals> for GoalsDocument {
    fn from(goals: Goals) -> Self {
        Self {
            goal_steps: goals.steps,
            goal_calories: goals.calories,
            goal_active_time: goals.active_time,
        }
    }
}

impl From<GoalsDocument> for Goals {
    fn from(doc: GoalsDocument) -> Self {
        Goals::new(doc.goal_steps, doc.goal_calories, doc.goal_active_time)
    }
}

/// Daily document at `users/{uid}/daily_stats/{date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatsDocument {
    pub steps: u32,
    pub calories: u32,
    pub active_time: u32,
    #[serde(default)]
    pub date: String,
    /// Document id, filled in on listing.
    #[serde(default, alias = "_firestore_id", skip_serializing)]
    pub doc_id: Option<String>,
}

impl DailyStatsDocument {
    /// Id of the document this record is written to.
    pub fn document_id(&self) -> &str {
        &self.date
    }

    /// Convert to local metrics.
    ///
    /// The document id is the day. The `date` field is only consulted for
    /// records that were never stored, which have no id.
    pub fn to_metrics(&self) -> Option<DailyMetrics> {
        let date = match self.doc_id.as_deref() {
            Some(id) => parse_date_key(id)?,
            None => parse_date_key(&self.date)?,
        };
        Some(DailyMetrics {
            date,
            steps: self.steps,
            calories: self.calories,
            active_time: self.active_time,
        })
    }
}

impl From<&DailyMetrics> for DailyStatsDocument {
    fn from(metrics: &DailyMetrics) -> Self {
        Self {
            steps: metrics.steps,
            calories: metrics.calories,
            active_time: metrics.active_time,
            date: date_key(metrics.date),
            doc_id: None,
        }
    }
}

// ─── Paths ───────────────────────────────────────────────────

pub fn user_path(uid: &str) -> String {
    format!("{}/{}", collections::USERS, uid)
}

pub fn goals_path(uid: &str) -> String {
    format!(
        "{}/{}/{}",
        user_path(uid),
        collections::SETTINGS,
        collections::GOALS_DOC
    )
}

pub fn daily_stats_collection_path(uid: &str) -> String {
    format!("{}/{}", user_path(uid), collections::DAILY_STATS)
}

pub fn daily_stats_path(uid: &str, date: &str) -> String {
    format!("{}/{}", daily_stats_collection_path(uid), date)
}

/// Whole-document access to the per-user remote tree.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn get_profile(&self, uid: &str) -> Result<Option<ProfileDocument>, AppError>;

    async fn set_profile(&self, uid: &str, doc: &ProfileDocument) -> Result<(), AppError>;

    /// Delete `users/{uid}`. Subcollections are left in place.
    async fn delete_user(&self, uid: &str) -> Result<(), AppError>;

    async fn get_goals(&self, uid: &str) -> Result<Option<GoalsDocument>, AppError>;

    async fn set_goals(&self, uid: &str, doc: &GoalsDocument) -> Result<(), AppError>;

    /// Overwrite the document named by `doc.date`.
    async fn set_daily_stats(&self, uid: &str, doc: &DailyStatsDocument) -> Result<(), AppError>;

    /// Every document in `daily_stats`, in no particular order.
    async fn list_daily_stats(&self, uid: &str) -> Result<Vec<DailyStatsDocument>, AppError>;
}
