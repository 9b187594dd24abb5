// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-way pushes and pulls between the local stores and the remote
//! per-user document tree.
//!
//! Every operation is keyed by the identity provider's current user. With
//! nobody signed in an operation does nothing. Remote failures are logged
//! and reported as [`SyncOutcome::Failed`], never returned as errors, so
//! callers can run them in the background and forget them.

use crate::db::remote::{DailyStatsDocument, GoalsDocument, ProfileDocument, RemoteStore};
use crate::db::{self, LocalStore, PreferenceStore};
use crate::error::AppError;
use crate::models::{Goals, Profile};
use crate::services::identity::IdentityProvider;
use crate::time_utils::now_millis;
use std::sync::Arc;

/// How a sync operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nobody signed in; nothing was read or written.
    Skipped,
    /// The source document or record does not exist; nothing was written.
    NotFound,
    Completed,
    /// Failed and logged.
    Failed,
}

impl SyncOutcome {
    pub fn is_completed(self) -> bool {
        self == SyncOutcome::Completed
    }
}

#[derive(Clone)]
pub struct SyncService {
    local: LocalStore,
    prefs: PreferenceStore,
    remote: Arc<dyn RemoteStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl SyncService {
    pub fn new(
        local: LocalStore,
        prefs: PreferenceStore,
        remote: Arc<dyn RemoteStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            local,
            prefs,
            remote,
            identity,
        }
    }

    fn uid_for(&self, operation: &'static str) -> Option<String> {
        let uid = self.identity.current_uid();
        if uid.is_none() {
            tracing::debug!(operation, "Not signed in, skipping sync");
        }
        uid
    }

    // ─── Goals ───────────────────────────────────────────────────

    /// Overwrite `settings/goals` with the local goals.
    pub async fn push_goals(&self) -> SyncOutcome {
        let Some(uid) = self.uid_for("push_goals") else {
            return SyncOutcome::Skipped;
        };
        settle("push_goals", &uid, self.try_push_goals(&uid).await)
    }

    async fn try_push_goals(&self, uid: &str) -> Result<SyncOutcome, AppError> {
        let local = self.local.clone();
        let goals = db::blocking(move || local.goals_or_default()).await?;

        self.remote
            .set_goals(uid, &GoalsDocument::from(goals))
            .await?;
        Ok(SyncOutcome::Completed)
    }

    /// Replace the local goals with `settings/goals`, if it exists.
    pub async fn pull_goals(&self) -> SyncOutcome {
        let Some(uid) = self.uid_for("pull_goals") else {
            return SyncOutcome::Skipped;
        };
        settle("pull_goals", &uid, self.try_pull_goals(&uid).await)
    }

    async fn try_pull_goals(&self, uid: &str) -> Result<SyncOutcome, AppError> {
        let Some(doc) = self.remote.get_goals(uid).await? else {
            return Ok(SyncOutcome::NotFound);
        };

        let local = self.local.clone();
        let goals = Goals::from(doc);
        db::blocking(move || local.save_goals(&goals)).await?;
        Ok(SyncOutcome::Completed)
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Overwrite `users/{uid}` with `profile`, marked complete and stamped
    /// with the current time.
    pub async fn push_profile(&self, profile: &Profile) -> SyncOutcome {
        let Some(uid) = self.uid_for("push_profile") else {
            return SyncOutcome::Skipped;
        };
        let doc = ProfileDocument::completed(profile, now_millis());
        let result = self
            .remote
            .set_profile(&uid, &doc)
            .await
            .map(|()| SyncOutcome::Completed);
        settle("push_profile", &uid, result)
    }

    /// Copy `users/{uid}` into the preference store, setup flag included.
    pub async fn pull_profile(&self) -> SyncOutcome {
        let Some(uid) = self.uid_for("pull_profile") else {
            return SyncOutcome::Skipped;
        };
        settle("pull_profile", &uid, self.try_pull_profile(&uid).await)
    }

    async fn try_pull_profile(&self, uid: &str) -> Result<SyncOutcome, AppError> {
        let Some(doc) = self.remote.get_profile(uid).await? else {
            return Ok(SyncOutcome::NotFound);
        };

        let prefs = self.prefs.clone();
        db::blocking(move || {
            prefs.save_profile(&doc.profile())?;
            prefs.set_setup_complete(doc.setup_complete)
        })
        .await?;
        Ok(SyncOutcome::Completed)
    }

    /// Copy only the remote `setup_complete` flag into the preference store.
    ///
    /// A missing profile document clears the flag. On failure the local
    /// flag is left as it was.
    pub async fn pull_setup_status(&self) -> SyncOutcome {
        let Some(uid) = self.uid_for("pull_setup_status") else {
            return SyncOutcome::Skipped;
        };
        settle(
            "pull_setup_status",
            &uid,
            self.try_pull_setup_status(&uid).await,
        )
    }

    async fn try_pull_setup_status(&self, uid: &str) -> Result<SyncOutcome, AppError> {
        let doc = self.remote.get_profile(uid).await?;
        let (complete, outcome) = match doc {
            Some(doc) => (doc.setup_complete, SyncOutcome::Completed),
            None => (false, SyncOutcome::NotFound),
        };

        let prefs = self.prefs.clone();
        db::blocking(move || prefs.set_setup_complete(complete)).await?;
        Ok(outcome)
    }

    // ─── Daily Stats ─────────────────────────────────────────────

    /// Overwrite `daily_stats/{today}` with today's local record.
    pub async fn push_today_metrics(&self) -> SyncOutcome {
        let Some(uid) = self.uid_for("push_today_metrics") else {
            return SyncOutcome::Skipped;
        };
        settle(
            "push_today_metrics",
            &uid,
            self.try_push_today_metrics(&uid).await,
        )
    }

    async fn try_push_today_metrics(&self, uid: &str) -> Result<SyncOutcome, AppError> {
        let local = self.local.clone();
        let Some(today) = db::blocking(move || local.get_today_data()).await? else {
            return Ok(SyncOutcome::NotFound);
        };

        let doc = DailyStatsDocument::from(&today);
        self.remote.set_daily_stats(uid, &doc).await?;
        tracing::debug!(uid, date = %doc.date, "Daily stats pushed");
        Ok(SyncOutcome::Completed)
    }

    /// Write every remote `daily_stats` document into the local store.
    ///
    /// Reads the whole collection in one request.
    pub async fn pull_all_metrics(&self) -> SyncOutcome {
        let Some(uid) = self.uid_for("pull_all_metrics") else {
            return SyncOutcome::Skipped;
        };
        settle(
            "pull_all_metrics",
            &uid,
            self.try_pull_all_metrics(&uid).await,
        )
    }

    async fn try_pull_all_metrics(&self, uid: &str) -> Result<SyncOutcome, AppError> {
        let docs = self.remote.list_daily_stats(uid).await?;

        let mut records = Vec::with_capacity(docs.len());
        for doc in &docs {
            match doc.to_metrics() {
                Some(metrics) => records.push(metrics),
                None => tracing::warn!(
                    uid,
                    date = %doc.date,
                    doc_id = ?doc.doc_id,
                    "Skipping daily stats document without a valid date"
                ),
            }
        }

        let count = records.len();
        let local = self.local.clone();
        db::blocking(move || {
            for metrics in &records {
                local.save_daily_data_on(metrics)?;
            }
            Ok(())
        })
        .await?;

        tracing::info!(uid, count, "Restored daily stats");
        Ok(SyncOutcome::Completed)
    }

    // ─── Account ─────────────────────────────────────────────────

    /// Delete the root `users/{uid}` document, then call `on_complete`.
    ///
    /// `settings` and `daily_stats` under it are not deleted. `on_complete`
    /// runs only when the delete succeeded.
    pub async fn wipe_remote<F>(&self, on_complete: F) -> SyncOutcome
    where
        F: FnOnce() + Send,
    {
        let Some(uid) = self.uid_for("wipe_remote") else {
            return SyncOutcome::Skipped;
        };
        let result = self
            .remote
            .delete_user(&uid)
            .await
            .map(|()| SyncOutcome::Completed);

        let outcome = settle("wipe_remote", &uid, result);
        if outcome.is_completed() {
            on_complete();
        }
        outcome
    }
}

/// Log the result of an operation and fold errors into `Failed`.
fn settle(operation: &'static str, uid: &str, result: Result<SyncOutcome, AppError>) -> SyncOutcome {
    match result {
        Ok(SyncOutcome::Completed) => {
            tracing::info!(operation, uid, "Sync completed");
            SyncOutcome::Completed
        }
        Ok(outcome) => {
            tracing::debug!(operation, uid, ?outcome, "Nothing to sync");
            outcome
        }
        Err(e) => {
            tracing::error!(operation, uid, error = %e, "Sync failed");
            SyncOutcome::Failed
        }
    }
}
