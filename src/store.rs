//! Persistence for journal snapshots.
//!
//! The analytics never touch storage. Callers load a [`MoodData`] snapshot
//! from a [`MoodRepository`], mutate it through the model's lifecycle methods
//! and save it back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::model::MoodData;

/// Load/save interface for journal snapshots.
pub trait MoodRepository: Send + Sync {
    /// Load the current snapshot. An empty journal is not an error.
    fn load(&self) -> Result<MoodData, StoreError>;

    /// Replace the stored snapshot.
    fn save(&self, data: &MoodData) -> Result<(), StoreError>;

    /// Load, apply `f`, and save the result.
    fn update<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        Self: Sized,
        F: FnOnce(&mut MoodData) -> R,
    {
        let mut data = self.load()?;
        let result = f(&mut data);
        self.save(&data)?;
        Ok(result)
    }
}

// ==================== JSON File Store ====================

/// Stores the journal as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by a single JSON file.
    ///
    /// Nothing is touched on disk until the first load or save.
    ///
    /// # Arguments
    /// * `path` - Location of the journal file; missing parent directories are created on save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MoodRepository for JsonFileStore {
    fn load(&self) -> Result<MoodData, StoreError> {
        if !self.path.exists() {
            tracing::debug!("No journal at {}, starting empty", self.path.display());
            return Ok(MoodData::new());
        }

        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(MoodData::new());
        }

        let data: MoodData =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Deserialize {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Loaded {} days from {}", data.len(), self.path.display());
        Ok(data)
    }

    fn save(&self, data: &MoodData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_vec_pretty(data)?;

        // Write then rename so a crash never leaves a truncated journal behind.
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|source| StoreError::Write {
            path: temp.clone(),
            source,
        })?;
        fs::rename(&temp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Saved {} days to {}", data.len(), self.path.display());
        Ok(())
    }
}

// ==================== In-Memory Store ====================

/// Keeps the journal in memory. Clones share the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MoodData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: MoodData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }
}

impl MoodRepository for MemoryStore {
    fn load(&self) -> Result<MoodData, StoreError> {
        self.data
            .lock()
            .map(|data| data.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, data: &MoodData) -> Result<(), StoreError> {
        let mut guard = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = data.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;
    use crate::model::{MoodLevel, TimeOfDay};

    fn sample_data() -> MoodData {
        let mut data = MoodData::new();
        data.save_mood(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            TimeOfDay::Morning,
            MoodLevel::new(5).unwrap(),
            Some("sunny walk".to_string()),
        );
        data
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));

        let data = store.load().unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("journal.json"));

        let data = sample_data();
        store.save(&data).unwrap();

        assert_eq!(store.load().unwrap(), data);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dirs").join("journal.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_data()).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_load_corrupt_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();

        assert!(matches!(err, StoreError::Deserialize { .. }));
        assert!(err.to_string().contains("journal.json"));
    }

    #[test]
    fn test_load_blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, "\n").unwrap();

        assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.save(&sample_data()).unwrap();

        assert_eq!(other.load().unwrap(), sample_data());
    }

    #[test]
    fn test_update_persists_changes() {
        let store = MemoryStore::with_data(sample_data());
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let removed = store.update(|data| data.reset_day(day)).unwrap();

        assert!(removed);
        assert!(store.load().unwrap().is_empty());
    }
}
