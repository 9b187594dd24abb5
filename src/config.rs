//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first when present.

use crate::db::local::DATABASE_FILE;
use crate::db::prefs::PREFERENCES_FILE;
use std::env;
use std::path::PathBuf;

/// Which remote document store to mirror user data to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteBackend {
    /// In-process store; data lives only as long as the server.
    Memory,
    Firestore,
}

impl std::str::FromStr for RemoteBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(RemoteBackend::Memory),
            "firestore" => Ok(RemoteBackend::Firestore),
            _ => Err(ConfigError::Invalid {
                key: "REMOTE_BACKEND",
                value: value.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the database and preference files
    pub data_dir: PathBuf,
    /// Allowed CORS origin
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    pub remote_backend: RemoteBackend,
    /// GCP project ID (required for Firestore)
    pub gcp_project_id: Option<String>,
    /// User to sign in at startup
    pub user_id: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            remote_backend: RemoteBackend::Memory,
            gcp_project_id: None,
            user_id: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let remote_backend = match non_empty("REMOTE_BACKEND") {
            Some(value) => value.parse()?,
            None => RemoteBackend::Memory,
        };

        let gcp_project_id = non_empty("GCP_PROJECT_ID");
        if remote_backend == RemoteBackend::Firestore && gcp_project_id.is_none() {
            return Err(ConfigError::Missing("GCP_PROJECT_ID"));
        }

        let port = match non_empty("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => 8080,
        };

        Ok(Self {
            data_dir: non_empty("TRACKFIT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
            remote_backend,
            gcp_project_id,
            user_id: non_empty("TRACKFIT_USER_ID"),
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_backend_parse() {
        assert_eq!("memory".parse::<RemoteBackend>().unwrap(), RemoteBackend::Memory);
        assert_eq!(
            " Firestore ".parse::<RemoteBackend>().unwrap(),
            RemoteBackend::Firestore
        );
        assert!(matches!(
            "postgres".parse::<RemoteBackend>(),
            Err(ConfigError::Invalid { key: "REMOTE_BACKEND", .. })
        ));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/trackfit"),
            ..Config::default()
        };
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/trackfit/fitness_tracker.db")
        );
        assert_eq!(
            config.preferences_path(),
            PathBuf::from("/tmp/trackfit/user_prefs.json")
        );
    }
}
