// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for metrics, goals and the profile.
//!
//! Form values arrive as the raw strings the user typed. Each write
//! validates them in on-screen order, parses, saves locally, and then
//! pushes to the remote store in the background.

use crate::db;
use crate::error::Result;
use crate::models::{DailyEntry, DailyMetrics, DailyProgress, Goals, Profile};
use crate::time_utils::{date_key, format_display_date, today};
use crate::validation::{
    validate_daily_entry, validate_field, validate_profile, FailureKind, Field,
};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/validate", post(validate))
        .route("/api/today", get(get_today))
        .route("/api/daily", post(save_daily))
        .route("/api/history", get(get_history))
        .route("/api/goals", get(get_goals).put(save_goals))
        .route("/api/profile", get(get_profile).put(save_profile))
}

// ─── Validation ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub field: Field,
    pub value: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ValidateResponse {
    pub valid: bool,
    pub error: Option<String>,
    pub kind: Option<FailureKind>,
}

/// Validate one field without saving anything.
async fn validate(Json(req): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let result = validate_field(req.field, req.value.as_deref());
    Json(ValidateResponse {
        valid: result.is_valid(),
        error: result.error_message().map(str::to_string),
        kind: result.kind(),
    })
}

// ─── Daily Metrics ───────────────────────────────────────────

/// Raw daily-metrics form. Also used for goals.
#[derive(Deserialize)]
pub struct MetricsForm {
    pub steps: Option<String>,
    pub calories: Option<String>,
    pub active_time: Option<String>,
}

impl MetricsForm {
    fn parse(&self) -> Result<DailyEntry> {
        validate_daily_entry(
            self.steps.as_deref(),
            self.calories.as_deref(),
            self.active_time.as_deref(),
        )?;
        DailyEntry::parse(
            self.steps.as_deref().unwrap_or_default(),
            self.calories.as_deref().unwrap_or_default(),
            self.active_time.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TodayResponse {
    pub date: String,
    /// Null until something is saved today
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub metrics: Option<DailyMetrics>,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub progress: DailyProgress,
}

/// Today's metrics and progress toward the goals.
async fn get_today(State(state): State<Arc<AppState>>) -> Result<Json<TodayResponse>> {
    let local = state.local.clone();
    let (metrics, goals) = db::blocking(move || {
        let metrics = local.get_today_data()?;
        let goals = local.goals_or_default()?;
        Ok((metrics, goals))
    })
    .await?;

    Ok(Json(TodayResponse {
        date: date_key(today()),
        progress: DailyProgress::from_metrics(metrics.as_ref(), &goals),
        metrics,
    }))
}

/// Save today's metrics, replacing anything saved earlier today.
async fn save_daily(
    State(state): State<Arc<AppState>>,
    Json(form): Json<MetricsForm>,
) -> Result<Json<DailyMetrics>> {
    let entry = form.parse()?;

    let local = state.local.clone();
    db::blocking(move || local.save_daily_data(entry)).await?;
    tracing::info!(
        steps = entry.steps,
        calories = entry.calories,
        active_time = entry.active_time,
        "Daily metrics saved"
    );

    let sync = state.sync.clone();
    tokio::spawn(async move {
        sync.push_today_metrics().await;
    });

    Ok(Json(entry.on(today())))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryEntry {
    /// `yyyy-MM-dd`
    pub date: String,
    /// e.g. `Jan 05, 2024`
    pub display_date: String,
    pub steps: u32,
    pub calories: u32,
    pub active_time: u32,
}

impl From<DailyMetrics> for HistoryEntry {
    fn from(m: DailyMetrics) -> Self {
        Self {
            date: date_key(m.date),
            display_date: format_display_date(m.date),
            steps: m.steps,
            calories: m.calories,
            active_time: m.active_time,
        }
    }
}

/// Every saved day, newest first.
async fn get_history(State(state): State<Arc<AppState>>) -> Result<Json<Vec<HistoryEntry>>> {
    let local = state.local.clone();
    let history = db::blocking(move || {
        local
            .history()
            .map(|record| record.map(HistoryEntry::from))
            .collect::<std::result::Result<Vec<_>, _>>()
    })
    .await?;

    Ok(Json(history))
}

// ─── Goals ───────────────────────────────────────────────────

async fn get_goals(State(state): State<Arc<AppState>>) -> Result<Json<Goals>> {
    let local = state.local.clone();
    let goals = db::blocking(move || local.goals_or_default()).await?;
    Ok(Json(goals))
}

/// Replace the goals. Values follow the daily-metric rules.
async fn save_goals(
    State(state): State<Arc<AppState>>,
    Json(form): Json<MetricsForm>,
) -> Result<Json<Goals>> {
    let entry = form.parse()?;
    let goals = Goals::new(entry.steps, entry.calories, entry.active_time);

    let local = state.local.clone();
    db::blocking(move || local.save_goals(&goals)).await?;
    tracing::info!(?goals, "Goals saved");

    let sync = state.sync.clone();
    tokio::spawn(async move {
        sync.push_goals().await;
    });

    Ok(Json(goals))
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub gender: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub name: String,
    pub age: u32,
    pub height: u32,
    pub weight: f32,
    pub gender: String,
    pub setup_complete: bool,
}

impl ProfileResponse {
    fn new(profile: Profile, setup_complete: bool) -> Self {
        Self {
            name: profile.name,
            age: profile.age,
            height: profile.height,
            weight: profile.weight,
            gender: profile.gender,
            setup_complete,
        }
    }
}

async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<ProfileResponse>> {
    let prefs = state.prefs.clone();
    let (profile, setup_complete) =
        db::blocking(move || Ok((prefs.profile()?, prefs.is_setup_complete()?))).await?;
    Ok(Json(ProfileResponse::new(profile, setup_complete)))
}

/// Save the profile and mark onboarding as finished.
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<ProfileResponse>> {
    validate_profile(
        form.name.as_deref(),
        form.age.as_deref(),
        form.height.as_deref(),
        form.weight.as_deref(),
        form.gender.as_deref(),
    )?;
    let profile = Profile::parse(
        form.name.as_deref().unwrap_or_default(),
        form.age.as_deref().unwrap_or_default(),
        form.height.as_deref().unwrap_or_default(),
        form.weight.as_deref().unwrap_or_default(),
        form.gender.as_deref().unwrap_or_default(),
    )?;

    let prefs = state.prefs.clone();
    let saved = profile.clone();
    db::blocking(move || {
        prefs.save_profile(&saved)?;
        prefs.set_setup_complete(true)
    })
    .await?;
    tracing::info!(age = profile.age, "Profile saved");

    let sync = state.sync.clone();
    let pushed = profile.clone();
    tokio::spawn(async move {
        sync.push_profile(&pushed).await;
    });

    Ok(Json(ProfileResponse::new(profile, true)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_formats_dates() {
        let entry = HistoryEntry::from(DailyMetrics {
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            steps: 1,
            calories: 2,
            active_time: 3,
        });
        assert_eq!(entry.date, "2024-01-05");
        assert_eq!(entry.display_date, "Jan 05, 2024");
    }

    #[test]
    fn test_metrics_form_stops_at_first_failure() {
        let form = MetricsForm {
            steps: Some("1.5".to_string()),
            calories: None,
            active_time: None,
        };
        match form.parse() {
            Err(crate::error::AppError::Validation { field, message }) => {
                assert_eq!(field, "steps");
                assert_eq!(message, "Steps must be whole numbers");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
