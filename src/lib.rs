// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TrackFit: daily activity tracking with optional cloud backup.
//!
//! This crate holds the input validation rules, the local metrics and
//! preference stores, the sync service that mirrors them to a per-user
//! remote document tree, and a small JSON API over all of it.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::{LocalStore, PreferenceStore, RemoteStore};
use services::{IdentityProvider, SessionIdentity, SessionService, SyncService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub local: LocalStore,
    pub prefs: PreferenceStore,
    pub identity: Arc<SessionIdentity>,
    pub sync: SyncService,
    pub session: SessionService,
}

impl AppState {
    /// Open the local stores under `config.data_dir` and wire the services
    /// to `remote`.
    pub fn new(config: Config, remote: Arc<dyn RemoteStore>) -> Result<Self, db::StoreError> {
        let local = LocalStore::open(config.database_path())?;
        let prefs = PreferenceStore::open(config.preferences_path())?;
        Ok(Self::with_stores(config, local, prefs, remote))
    }

    pub fn with_stores(
        config: Config,
        local: LocalStore,
        prefs: PreferenceStore,
        remote: Arc<dyn RemoteStore>,
    ) -> Self {
        let identity = Arc::new(SessionIdentity::new());
        let sync = SyncService::new(
            local.clone(),
            prefs.clone(),
            remote,
            identity.clone() as Arc<dyn IdentityProvider>,
        );
        let session = SessionService::new(identity.clone(), local.clone(), prefs.clone(), sync.clone());

        Self {
            config,
            local,
            prefs,
            identity,
            sync,
            session,
        }
    }
}
