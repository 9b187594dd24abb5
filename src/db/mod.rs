//! Storage layer: local SQLite store, preference file, and the remote
//! document store mirror (Firestore or in-memory).

pub mod firestore;
pub mod local;
pub mod memory;
pub mod prefs;
pub mod remote;

pub use firestore::FirestoreDb;
pub use local::LocalStore;
pub use memory::MemoryRemoteStore;
pub use prefs::PreferenceStore;
pub use remote::RemoteStore;

/// Remote collection and document names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SETTINGS: &str = "settings";
    /// Document id of the goals singleton under `settings`
    pub const GOALS_DOC: &str = "goals";
    /// One document per day, keyed by `yyyy-MM-dd`
    pub const DAILY_STATS: &str = "daily_stats";
}

/// Failures of the local stores (database file, preference file).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    Join(String),
}

/// Run a synchronous store operation off the async executor.
pub async fn blocking<F, T>(op: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
}
