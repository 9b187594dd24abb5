// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in restore, sign-out and account deletion.

use crate::db::{self, LocalStore, PreferenceStore};
use crate::error::{AppError, Result};
use crate::services::identity::SessionIdentity;
use crate::services::sync::{SyncOutcome, SyncService};
use std::sync::Arc;

/// Results of the restore run on sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInReport {
    /// Whether onboarding has been finished for this user.
    pub setup_complete: bool,
    pub profile: SyncOutcome,
    pub goals: SyncOutcome,
    pub metrics: SyncOutcome,
}

#[derive(Clone)]
pub struct SessionService {
    identity: Arc<SessionIdentity>,
    local: LocalStore,
    prefs: PreferenceStore,
    sync: SyncService,
}

impl SessionService {
    pub fn new(
        identity: Arc<SessionIdentity>,
        local: LocalStore,
        prefs: PreferenceStore,
        sync: SyncService,
    ) -> Self {
        Self {
            identity,
            local,
            prefs,
            sync,
        }
    }

    /// Record `uid` as the current user and restore their data.
    ///
    /// Reads the remote setup flag first, then pulls profile, goals and
    /// daily stats concurrently. Remote failures are logged and leave the
    /// local state as it was.
    pub async fn sign_in(&self, uid: &str) -> Result<SignInReport> {
        self.identity.sign_in(uid);
        tracing::info!(uid, "Signed in");

        self.sync.pull_setup_status().await;

        let (profile, goals, metrics) = tokio::join!(
            self.sync.pull_profile(),
            self.sync.pull_goals(),
            self.sync.pull_all_metrics(),
        );

        let prefs = self.prefs.clone();
        let setup_complete = db::blocking(move || prefs.is_setup_complete()).await?;

        Ok(SignInReport {
            setup_complete,
            profile,
            goals,
            metrics,
        })
    }

    /// Forget the user and reset both local stores.
    pub async fn sign_out(&self) -> Result<()> {
        let prefs = self.prefs.clone();
        let local = self.local.clone();
        db::blocking(move || {
            prefs.clear_user_data()?;
            prefs.set_setup_complete(false)?;
            local.clear_all_data()
        })
        .await?;

        self.identity.sign_out();
        tracing::info!("Signed out");
        Ok(())
    }

    /// Delete the remote profile, then clear local data and sign out.
    ///
    /// Local data is kept if the remote delete does not succeed.
    pub async fn delete_account(&self) -> Result<()> {
        let outcome = self
            .sync
            .wipe_remote(|| tracing::info!("Remote profile deleted"))
            .await;

        match outcome {
            SyncOutcome::Completed => self.sign_out().await,
            SyncOutcome::Skipped => Err(AppError::BadRequest("Not signed in".to_string())),
            _ => Err(AppError::Remote("Failed to delete remote account".to_string())),
        }
    }
}
