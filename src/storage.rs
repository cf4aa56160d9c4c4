use rusqlite::{Connection, OptionalExtension, params};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Goal, ThemeMode};

const GOALS_KEY: &str = "goals";
const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create storage directory: {0}")]
    DirectoryError(String),
}

/// Key-value store backing the dashboard. Opening it is the one fallible
/// step; after that every read degrades to "absent" and every write is
/// absorbed, so callers never handle storage errors mid-session.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store file and initialize its schema
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            }
        }

        tracing::info!(path = %db_path.display(), "opening store");
        let conn = Connection::open(&db_path)?;

        let store = Store { conn };
        store.initialize_schema()?;

        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read one key; lookup failures read as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional();
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed");
                None
            }
        }
    }

    /// Write one key; failures are absorbed and the in-memory state stays
    /// authoritative for the running session.
    pub fn set(&self, key: &str, value: &str) {
        let result = self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        );
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "store write failed");
        }
    }

    /// Load the persisted goal list. An absent key, unparseable JSON, or a
    /// payload that is not an array all read as an empty list.
    pub fn load_goals(&self) -> Vec<Goal> {
        let Some(raw) = self.get(GOALS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(goals) => goals,
            Err(e) => {
                tracing::warn!(error = %e, "stored goal list is unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Persist the full goal list as one JSON array.
    pub fn save_goals(&self, goals: &[Goal]) {
        match serde_json::to_string(goals) {
            Ok(json) => self.set(GOALS_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "goal list failed to serialize"),
        }
    }

    pub fn load_theme(&self) -> Option<ThemeMode> {
        self.get(THEME_KEY).and_then(|raw| ThemeMode::parse(&raw))
    }

    pub fn save_theme(&self, mode: ThemeMode) {
        self.set(THEME_KEY, mode.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalDraft, Priority};
    use chrono::{TimeZone, Utc};

    fn open_temp_store(dir: &tempfile::TempDir) -> Store {
        let path = dir.path().join("nested").join("strive.db");
        Store::open(path.to_str().unwrap()).expect("store should open")
    }

    fn sample_goal(title: &str) -> Goal {
        Goal::new(GoalDraft {
            title: title.to_string(),
            description: "some notes".to_string(),
            deadline: Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
            priority: Priority::High,
            steps: 3,
        })
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_temp_store(&dir);
        assert!(store.load_goals().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_goals_field_for_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_temp_store(&dir);

        let mut done = sample_goal("Ship the release");
        done.completed = true;
        done.completed_steps = 3;
        done.completed_at = Some(Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap());
        let open = sample_goal("Read ten books");

        store.save_goals(&[done.clone(), open.clone()]);
        assert_eq!(store.load_goals(), vec![done, open]);
    }

    #[test]
    fn save_replaces_the_previous_list_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_temp_store(&dir);

        store.save_goals(&[sample_goal("a"), sample_goal("b")]);
        let only = sample_goal("c");
        store.save_goals(&[only.clone()]);
        assert_eq!(store.load_goals(), vec![only]);
    }

    #[test]
    fn unreadable_goal_payload_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_temp_store(&dir);

        store.set(GOALS_KEY, "not json");
        assert!(store.load_goals().is_empty());

        // Valid JSON that is not an array degrades the same way.
        store.set(GOALS_KEY, "{\"title\":\"alone\"}");
        assert!(store.load_goals().is_empty());
        store.set(GOALS_KEY, "42");
        assert!(store.load_goals().is_empty());
    }

    #[test]
    fn theme_preference_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_temp_store(&dir);

        assert_eq!(store.load_theme(), None);
        store.save_theme(ThemeMode::Light);
        assert_eq!(store.load_theme(), Some(ThemeMode::Light));
        store.save_theme(ThemeMode::Dark);
        assert_eq!(store.load_theme(), Some(ThemeMode::Dark));

        store.set(THEME_KEY, "sepia");
        assert_eq!(store.load_theme(), None);
    }
}
