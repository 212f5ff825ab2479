use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::files::{atomic_write, ensure_data_dir};
use crate::domain::{Task, Theme};
use crate::rewards::RewardLedger;

/// Persisted blob keys, one JSON file per key.
pub const KEY_TODO: &str = "todo";
pub const KEY_COMPLETED: &str = "completed";
pub const KEY_STATS: &str = "stats";
pub const KEY_THEME: &str = "theme";

/// Persistence gateway: loads and saves named JSON blobs under the
/// data directory. No business logic lives here; a missing or
/// malformed blob is simply its default.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Gateway rooted at the discovered data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            dir: ensure_data_dir()?,
        })
    }

    /// Gateway rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the blob for `key`, falling back to the default when the
    /// file is missing, unreadable or does not parse.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.blob_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(key, %err, "unreadable blob, using default");
                }
                return T::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "malformed blob, using default");
                T::default()
            }
        }
    }

    /// Save the blob for `key` atomically.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize blob '{key}'"))?;
        atomic_write(self.blob_path(key), &json)
            .with_context(|| format!("Failed to save blob '{key}'"))
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        self.load(KEY_TODO)
    }

    pub fn load_completed(&self) -> Vec<Task> {
        self.load(KEY_COMPLETED)
    }

    /// Load the reward state, re-deriving the level so a stale
    /// persisted value never survives.
    pub fn load_stats(&self) -> RewardLedger {
        self.load::<RewardLedger>(KEY_STATS).normalized()
    }

    pub fn load_theme(&self) -> Theme {
        self.load(KEY_THEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_blobs_load_as_defaults() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::at(temp_dir.path());

        assert!(storage.load_tasks().is_empty());
        assert!(storage.load_completed().is_empty());
        assert_eq!(storage.load_stats(), RewardLedger::default());
        assert_eq!(storage.load_theme(), Theme::default());
    }

    #[test]
    fn test_malformed_blob_loads_as_default() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::at(temp_dir.path());

        std::fs::write(temp_dir.path().join("todo.json"), "{not json").unwrap();
        std::fs::write(temp_dir.path().join("stats.json"), "[1,2,3]").unwrap();

        assert!(storage.load_tasks().is_empty());
        assert_eq!(storage.load_stats(), RewardLedger::default());
    }

    #[test]
    fn test_save_and_load_tasks_round_trip() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::at(temp_dir.path());

        let tasks = vec![
            Task::new("Buy milk").unwrap(),
            Task::new("Walk dog").unwrap(),
        ];
        storage.save(KEY_TODO, &tasks).unwrap();

        assert_eq!(storage.load_tasks(), tasks);
    }

    #[test]
    fn test_load_stats_normalizes_stale_level() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::at(temp_dir.path());

        std::fs::write(
            temp_dir.path().join("stats.json"),
            r#"{"xp": 25, "level": 99}"#,
        )
        .unwrap();

        let ledger = storage.load_stats();
        assert_eq!(ledger.xp, 25);
        assert_eq!(ledger.level, 2);
    }

    #[test]
    fn test_loads_original_localstorage_shapes() {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::at(temp_dir.path());

        std::fs::write(
            temp_dir.path().join("todo.json"),
            r#"[{"text":"Buy milk","completed":false},
                {"text":"Old one","completed":true,"xpAwarded":true}]"#,
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("theme.json"),
            r##"{"name":"custom","color":"#aabbcc"}"##,
        )
        .unwrap();

        let tasks = storage.load_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "Buy milk");
        assert!(tasks[1].xp_awarded);

        let theme = storage.load_theme();
        assert_eq!(theme.name, "custom");
        assert_eq!(theme.color, "#aabbcc");
    }
}
