// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process remote store.
//!
//! Keeps documents as JSON values keyed by their full path. Used when no
//! cloud backend is configured and by the tests, which can take it offline
//! and count the calls made against it.

use crate::db::remote::{
    daily_stats_collection_path, daily_stats_path, goals_path, user_path, DailyStatsDocument,
    GoalsDocument, ProfileDocument, RemoteStore,
};
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    documents: DashMap<String, serde_json::Value>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of store calls made so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Raw document at `path`.
    pub fn document(&self, path: &str) -> Option<serde_json::Value> {
        self.documents.get(path).map(|doc| doc.value().clone())
    }

    /// Store a raw document at `path`, bypassing the typed writers.
    pub fn insert_document(&self, path: impl Into<String>, doc: serde_json::Value) {
        self.documents.insert(path.into(), doc);
    }

    fn begin(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Remote("remote store unreachable".to_string()));
        }
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        self.begin()?;
        self.documents
            .get(path)
            .map(|doc| serde_json::from_value(doc.value().clone()))
            .transpose()
            .map_err(|e| AppError::Remote(format!("malformed document {}: {}", path, e)))
    }

    fn set<T: Serialize>(&self, path: String, doc: &T) -> Result<(), AppError> {
        self.begin()?;
        let value = serde_json::to_value(doc).map_err(|e| AppError::Remote(e.to_string()))?;
        self.documents.insert(path, value);
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<ProfileDocument>, AppError> {
        self.get(&user_path(uid))
    }

    async fn set_profile(&self, uid: &str, doc: &ProfileDocument) -> Result<(), AppError> {
        self.set(user_path(uid), doc)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.begin()?;
        self.documents.remove(&user_path(uid));
        Ok(())
    }

    async fn get_goals(&self, uid: &str) -> Result<Option<GoalsDocument>, AppError> {
        self.get(&goals_path(uid))
    }

    async fn set_goals(&self, uid: &str, doc: &GoalsDocument) -> Result<(), AppError> {
        self.set(goals_path(uid), doc)
    }

    async fn set_daily_stats(&self, uid: &str, doc: &DailyStatsDocument) -> Result<(), AppError> {
        self.set(daily_stats_path(uid, doc.document_id()), doc)
    }

    async fn list_daily_stats(&self, uid: &str) -> Result<Vec<DailyStatsDocument>, AppError> {
        self.begin()?;
        let prefix = format!("{}/", daily_stats_collection_path(uid));

        self.documents
            .iter()
            .filter_map(|entry| {
                let id = entry.key().strip_prefix(&prefix)?;
                // Direct children only
                if id.contains('/') {
                    return None;
                }
                let mut value = entry.value().clone();
                if let Some(fields) = value.as_object_mut() {
                    fields.insert("_firestore_id".to_string(), id.into());
                }
                Some(serde_json::from_value(value).map_err(|e| AppError::Remote(e.to_string())))
            })
            .collect()
    }
}
