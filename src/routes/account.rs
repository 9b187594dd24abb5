// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and account routes.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::State,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", post(sign_in).delete(sign_out))
        .route("/api/account", delete(delete_account))
}

#[derive(Deserialize, Validate)]
pub struct SessionRequest {
    /// User id issued by the identity provider
    #[validate(length(min = 1, max = 128))]
    pub uid: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub uid: String,
    /// False means the client should show onboarding
    pub setup_complete: bool,
}

/// Sign in and restore the user's remote data into the local stores.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<SessionResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid uid: {}", e)))?;
    let uid = req.uid.trim().to_string();
    if uid.is_empty() || uid.contains('/') {
        return Err(AppError::BadRequest("Invalid uid".to_string()));
    }

    let report = state.session.sign_in(&uid).await?;
    tracing::info!(
        uid = %uid,
        setup_complete = report.setup_complete,
        profile = ?report.profile,
        goals = ?report.goals,
        metrics = ?report.metrics,
        "Session restored"
    );

    Ok(Json(SessionResponse {
        uid,
        setup_complete: report.setup_complete,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// Sign out and reset local data.
async fn sign_out(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>> {
    state.session.sign_out().await?;
    Ok(Json(StatusResponse {
        success: true,
        message: "Signed out".to_string(),
    }))
}

/// Delete the remote profile, then reset local data.
async fn delete_account(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>> {
    state.session.delete_account().await?;
    Ok(Json(StatusResponse {
        success: true,
        message: "Account deleted".to_string(),
    }))
}
