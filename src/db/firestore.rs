// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`RemoteStore`].
//!
//! Per-user data lives under `users/{uid}`:
//! - the root document holds the profile
//! - `settings/goals` holds the goals
//! - `daily_stats/{yyyy-MM-dd}` holds one document per day

use crate::db::collections;
use crate::db::remote::{DailyStatsDocument, GoalsDocument, ProfileDocument, RemoteStore};
use crate::error::AppError;
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator takes an unauthenticated connection
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Remote(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Remote(format!("Failed to connect to Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client (offline mode).
    ///
    /// All operations return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Remote("Database not connected (offline mode)".to_string()))
    }

    /// Parent path `users/{uid}` for the per-user subcollections.
    fn user_parent(&self, uid: &str) -> Result<firestore::ParentPathBuilder, AppError> {
        self.get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Remote(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for FirestoreDb {
    // ─── Profile ─────────────────────────────────────────────────

    async fn get_profile(&self, uid: &str) -> Result<Option<ProfileDocument>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Remote(e.to_string()))
    }

    async fn set_profile(&self, uid: &str, doc: &ProfileDocument) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }

    // ─── Goals ───────────────────────────────────────────────────

    async fn get_goals(&self, uid: &str) -> Result<Option<GoalsDocument>, AppError> {
        let parent = self.user_parent(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SETTINGS)
            .parent(&parent)
            .obj()
            .one(collections::GOALS_DOC)
            .await
            .map_err(|e| AppError::Remote(e.to_string()))
    }

    async fn set_goals(&self, uid: &str, doc: &GoalsDocument) -> Result<(), AppError> {
        let parent = self.user_parent(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SETTINGS)
            .document_id(collections::GOALS_DOC)
            .parent(&parent)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }

    // ─── Daily Stats ─────────────────────────────────────────────

    async fn set_daily_stats(&self, uid: &str, doc: &DailyStatsDocument) -> Result<(), AppError> {
        let parent = self.user_parent(uid)?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DAILY_STATS)
            .document_id(doc.document_id())
            .parent(&parent)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }

    async fn list_daily_stats(&self, uid: &str) -> Result<Vec<DailyStatsDocument>, AppError> {
        let parent = self.user_parent(uid)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::DAILY_STATS)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))
    }
}
