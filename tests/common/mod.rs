// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;
use tempfile::TempDir;
use trackfit::config::Config;
use trackfit::db::{FirestoreDb, LocalStore, MemoryRemoteStore, PreferenceStore, RemoteStore};
use trackfit::routes::create_router;
use trackfit::services::{IdentityProvider, SessionIdentity, SyncService};
use trackfit::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Generate a unique user id for test isolation.
#[allow(dead_code)]
pub fn unique_uid() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-user-{}", nanos)
}

/// Local stores in a temporary directory that lives as long as this value.
#[allow(dead_code)]
pub struct TestStores {
    pub dir: TempDir,
    pub local: LocalStore,
    pub prefs: PreferenceStore,
}

#[allow(dead_code)]
pub fn test_stores() -> TestStores {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalStore::open(dir.path().join("fitness_tracker.db")).unwrap();
    let prefs = PreferenceStore::open(dir.path().join("user_prefs.json")).unwrap();
    TestStores { dir, local, prefs }
}

/// A sync service over fresh local stores and an in-memory remote.
#[allow(dead_code)]
pub struct TestSync {
    pub stores: TestStores,
    pub remote: Arc<MemoryRemoteStore>,
    pub identity: Arc<SessionIdentity>,
    pub sync: SyncService,
}

#[allow(dead_code)]
pub fn test_sync(remote: Arc<MemoryRemoteStore>, uid: Option<&str>) -> TestSync {
    let stores = test_stores();
    let identity = Arc::new(match uid {
        Some(uid) => SessionIdentity::signed_in(uid),
        None => SessionIdentity::new(),
    });
    let sync = SyncService::new(
        stores.local.clone(),
        stores.prefs.clone(),
        remote.clone() as Arc<dyn RemoteStore>,
        identity.clone() as Arc<dyn IdentityProvider>,
    );
    TestSync {
        stores,
        remote,
        identity,
        sync,
    }
}

/// A router over temporary stores and an in-memory remote.
#[allow(dead_code)]
pub struct TestApp {
    pub dir: TempDir,
    pub app: axum::Router,
    pub state: Arc<AppState>,
    pub remote: Arc<MemoryRemoteStore>,
}

#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let remote = Arc::new(MemoryRemoteStore::new());
    let state = Arc::new(AppState::new(config, remote.clone()).unwrap());

    TestApp {
        dir,
        app: create_router(state.clone()),
        state,
        remote,
    }
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Wait until a background push has written the document at `path`.
#[allow(dead_code)]
pub async fn wait_for_document(remote: &MemoryRemoteStore, path: &str) -> serde_json::Value {
    for _ in 0..200 {
        if let Some(doc) = remote.document(path) {
            return doc;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("document {} was never written", path);
}
