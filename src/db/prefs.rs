// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Preference store for the user profile and the onboarding flag.
//!
//! A small JSON key-value file. Unset keys read back as the profile
//! defaults. No validation happens here.

use crate::db::StoreError;
use crate::models::Profile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Preference file name inside the data directory.
pub const PREFERENCES_FILE: &str = "user_prefs.json";

/// On-disk shape of the preference file. Absent keys are unset.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct StoredPrefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_weight: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    setup_complete: Option<bool>,
}

/// Handle to the preference file.
///
/// Clones share a lock so read-modify-write cycles from one process never
/// interleave.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl PreferenceStore {
    /// Use the preference file at `path`. The file is created on first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> Result<StoredPrefs, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(StoredPrefs::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredPrefs::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, prefs: &StoredPrefs) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(prefs)?;

        // Write to a temp file, then rename over the original
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, bytes)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn read(&self) -> Result<StoredPrefs, StoreError> {
        let _guard = self.guard();
        self.load()
    }

    fn update(&self, apply: impl FnOnce(&mut StoredPrefs)) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut prefs = self.load()?;
        apply(&mut prefs);
        self.store(&prefs)
    }

    // ─── Writes ──────────────────────────────────────────────────

    pub fn save_age_and_name(&self, age: u32, name: &str) -> Result<(), StoreError> {
        self.update(|p| {
            p.user_age = Some(age);
            p.user_name = Some(name.to_string());
        })
    }

    pub fn save_user_data(&self, height: u32, weight: f32, gender: &str) -> Result<(), StoreError> {
        self.update(|p| {
            p.user_height = Some(height);
            p.user_weight = Some(weight);
            p.user_gender = Some(gender.to_string());
        })
    }

    /// Store every profile attribute in one write.
    pub fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.update(|p| {
            p.user_name = Some(profile.name.clone());
            p.user_age = Some(profile.age);
            p.user_height = Some(profile.height);
            p.user_weight = Some(profile.weight);
            p.user_gender = Some(profile.gender.clone());
        })
    }

    pub fn set_setup_complete(&self, complete: bool) -> Result<(), StoreError> {
        self.update(|p| p.setup_complete = Some(complete))
    }

    /// Remove every key.
    pub fn clear_user_data(&self) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.store(&StoredPrefs::default())?;
        tracing::info!(path = %self.path.display(), "Cleared user preferences");
        Ok(())
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// The stored profile with defaults filled in for unset keys.
    pub fn profile(&self) -> Result<Profile, StoreError> {
        let prefs = self.read()?;
        let defaults = Profile::default();
        Ok(Profile {
            name: prefs.user_name.unwrap_or(defaults.name),
            age: prefs.user_age.unwrap_or(defaults.age),
            height: prefs.user_height.unwrap_or(defaults.height),
            weight: prefs.user_weight.unwrap_or(defaults.weight),
            gender: prefs.user_gender.unwrap_or(defaults.gender),
        })
    }

    pub fn get_user_name(&self) -> Result<String, StoreError> {
        Ok(self.profile()?.name)
    }

    pub fn get_user_age(&self) -> Result<u32, StoreError> {
        Ok(self.profile()?.age)
    }

    pub fn get_user_height(&self) -> Result<u32, StoreError> {
        Ok(self.profile()?.height)
    }

    pub fn get_user_weight(&self) -> Result<f32, StoreError> {
        Ok(self.profile()?.weight)
    }

    pub fn get_user_gender(&self) -> Result<String, StoreError> {
        Ok(self.profile()?.gender)
    }

    pub fn is_setup_complete(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.setup_complete.unwrap_or(false))
    }
}
