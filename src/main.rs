// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TrackFit API Server
//!
//! Serves the local metrics and profile stores over JSON and mirrors them
//! to a per-user remote document store.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trackfit::{
    config::{Config, RemoteBackend},
    db::{FirestoreDb, MemoryRemoteStore, RemoteStore},
    services::rollover::spawn_midnight_reset,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        backend = ?config.remote_backend,
        "Starting TrackFit API"
    );

    let remote: Arc<dyn RemoteStore> = match config.remote_backend {
        RemoteBackend::Memory => {
            tracing::warn!("Using in-memory remote store; remote data is not persisted");
            Arc::new(MemoryRemoteStore::new())
        }
        RemoteBackend::Firestore => {
            let project_id = config
                .gcp_project_id
                .as_deref()
                .expect("GCP_PROJECT_ID is checked when loading config");
            Arc::new(
                FirestoreDb::new(project_id)
                    .await
                    .expect("Failed to connect to Firestore"),
            )
        }
    };

    let state = Arc::new(
        AppState::new(config.clone(), remote).expect("Failed to open local stores"),
    );

    if let Some(uid) = config.user_id.as_deref() {
        let report = state.session.sign_in(uid).await?;
        tracing::info!(
            uid,
            setup_complete = report.setup_complete,
            "Signed in from configuration"
        );
    }

    let _rollover = spawn_midnight_reset(state.local.clone());

    // Build router
    let app = trackfit::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trackfit=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
