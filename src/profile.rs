//! User profile persistence: name, role, tone, favorites.
//!
//! Plain JSON file I/O with no invariants beyond last-write-wins. Kept
//! deliberately simple; the memory store is where the interesting contracts
//! live.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The stored user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub favorites: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Chad".into(),
            style: "formal".into(),
            role: String::new(),
            tone: String::new(),
            favorites: Vec::new(),
        }
    }
}

/// File-backed profile store.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the profile, falling back to defaults when the file is missing
    /// or unreadable.
    pub async fn load(&self) -> UserProfile {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %self.path.display(), %error, "profile file is corrupt, using defaults");
                UserProfile::default()
            }),
            Err(_) => UserProfile::default(),
        }
    }

    /// Persist the profile, creating parent directories as needed.
    pub async fn save(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        let write_error = |reason: String| ProfileError::Write {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(e.to_string()))?;
        }

        let raw =
            serde_json::to_string_pretty(profile).map_err(|e| write_error(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| write_error(e.to_string()))
    }

    pub async fn update_role(&self, role: impl Into<String>) -> Result<(), ProfileError> {
        let mut profile = self.load().await;
        profile.role = role.into();
        self.save(&profile).await
    }

    pub async fn update_tone(&self, tone: impl Into<String>) -> Result<(), ProfileError> {
        let mut profile = self.load().await;
        profile.tone = tone.into();
        self.save(&profile).await
    }

    /// Append a favorite and return the new total.
    pub async fn add_favorite(&self, entry: impl Into<String>) -> Result<usize, ProfileError> {
        let mut profile = self.load().await;
        profile.favorites.push(entry.into());
        let total = profile.favorites.len();
        self.save(&profile).await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ProfileStore {
        ProfileStore::new(dir.path().join("data").join("user_profile.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let profile = store.load().await;
        assert_eq!(profile.name, "Chad");
        assert_eq!(profile.style, "formal");
        assert!(profile.favorites.is_empty());
    }

    #[tokio::test]
    async fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.update_role("staff engineer").await.unwrap();
        store.update_tone("dry").await.unwrap();
        let total = store.add_favorite("espresso").await.unwrap();

        assert_eq!(total, 1);
        let profile = store.load().await;
        assert_eq!(profile.role, "staff engineer");
        assert_eq!(profile.tone, "dry");
        assert_eq!(profile.favorites, vec!["espresso".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_profile.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = ProfileStore::new(path);
        let profile = store.load().await;
        assert_eq!(profile, UserProfile::default());
    }
}
