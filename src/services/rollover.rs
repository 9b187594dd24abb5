// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scheduled reset of today's counters at local midnight.

use crate::db::{self, LocalStore};
use crate::time_utils::duration_until_next_midnight;
use chrono::Local;
use tokio::task::JoinHandle;

/// Run [`LocalStore::reset_daily_data`] at every local midnight until the
/// task is aborted.
pub fn spawn_midnight_reset(local: LocalStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_midnight(Local::now());
            tracing::debug!(seconds = wait.as_secs(), "Next daily reset scheduled");
            tokio::time::sleep(wait).await;

            let store = local.clone();
            match db::blocking(move || store.reset_daily_data()).await {
                Ok(()) => tracing::info!("Daily metrics reset at midnight"),
                Err(e) => tracing::error!(error = %e, "Failed to reset daily metrics"),
            }
        }
    })
}
