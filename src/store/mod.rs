//! JSON-file-backed profile store.
//!
//! One document per `userId`, held in memory behind a `RwLock` and
//! persisted as a single JSON file. The write lock spans the whole
//! read-modify-write of a mutation, so concurrent updates to the same
//! profile are serialized rather than racing last-write-wins. Saves go
//! through a temp file + rename so the store file is never left half
//! written.
//!
//! An in-memory mode (no backing file) exists for tests and ephemeral use.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

use crate::models::UserProfile;

/// On-disk layout of the store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    profiles: Vec<UserProfile>,
}

/// Store of user profiles keyed by user identifier.
#[derive(Debug)]
pub struct ProfileStore {
    path: Option<PathBuf>,
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl ProfileStore {
    /// Opens the store backed by the given file, loading any existing
    /// profiles.
    ///
    /// Creates parent directories as needed. A missing file is an empty
    /// store; an unreadable or corrupt file is an error, which callers
    /// treat as fatal at startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
            }
        }

        let profiles = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read profile store: {}", path.display()))?;
            let file: StoreFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse profile store: {}", path.display()))?;
            file.profiles
                .into_iter()
                .map(|profile| (profile.user_id.clone(), profile))
                .collect()
        } else {
            HashMap::new()
        };

        debug!(
            path = %path.display(),
            profiles = profiles.len(),
            "profile store opened"
        );

        Ok(Self {
            path: Some(path),
            profiles: RwLock::new(profiles),
        })
    }

    /// Creates a store with no backing file. Nothing is persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Fetches a profile by user identifier.
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    /// Returns true when a profile exists for the identifier.
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.profiles
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(user_id)
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns true when the store holds no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts or replaces a profile and persists the store.
    ///
    /// The mutation and the file write happen under the write lock; if the
    /// write fails the in-memory change is rolled back so the store never
    /// diverges from disk.
    pub fn put(&self, profile: UserProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let user_id = profile.user_id.clone();
        let previous = profiles.insert(user_id.clone(), profile);

        if let Err(error) = self.persist(&profiles) {
            match previous {
                Some(previous) => profiles.insert(user_id, previous),
                None => profiles.remove(&user_id),
            };
            return Err(error);
        }

        Ok(())
    }

    /// Writes the current profile set to the backing file, if any.
    fn persist(&self, profiles: &HashMap<String, UserProfile>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut file = StoreFile {
            profiles: profiles.values().cloned().collect(),
        };
        // Stable ordering keeps the file diffable across saves.
        file.profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        let contents = serde_json::to_string_pretty(&file)
            .context("Failed to serialize profile store")?;
        atomic_write(path, &contents)
            .with_context(|| format!("Failed to save profile store: {}", path.display()))
    }
}

/// Writes via a temp file + rename so a crash mid-write cannot corrupt the
/// store file.
fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write temp file: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace store file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeficiencyType;

    #[test]
    fn test_in_memory_put_and_get() {
        let store = ProfileStore::in_memory();
        assert!(store.is_empty());
        assert!(store.get("u1").is_none());

        store.put(UserProfile::new("u1")).unwrap();
        assert!(store.contains("u1"));
        assert_eq!(store.get("u1").unwrap().user_id, "u1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_replaces_existing() {
        let store = ProfileStore::in_memory();
        store.put(UserProfile::new("u1")).unwrap();

        let mut updated = store.get("u1").unwrap();
        updated.daltonism_type = DeficiencyType::Protanopia;
        store.put(updated).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("u1").unwrap().daltonism_type,
            DeficiencyType::Protanopia
        );
    }

    #[test]
    fn test_open_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("profiles.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_profiles_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        {
            let store = ProfileStore::open(&path).unwrap();
            let mut profile = UserProfile::new("persisted");
            profile.daltonism_type = DeficiencyType::Tritanopia;
            store.put(profile).unwrap();
        }

        let store = ProfileStore::open(&path).unwrap();
        let profile = store.get("persisted").unwrap();
        assert_eq!(profile.daltonism_type, DeficiencyType::Tritanopia);
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("profiles.json");
        let store = ProfileStore::open(&path).unwrap();
        store.put(UserProfile::new("u1")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "not json at all {{{").unwrap();
        assert!(ProfileStore::open(&path).is_err());
    }
}
