//! Test Engine Manager
//!
//! Provides isolated engine instances for testing:
//! - Temporary SQLite stores that are automatically cleaned up
//! - Pre-seeded review and study history
//! - Reopening the same store to exercise persistence

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use studyplan_core::{EngineConfig, SqliteStore, StudyEngine, StudyMetric};
use tempfile::TempDir;

/// Manager for test engines
///
/// Each manager owns its own database file, so tests never interfere.
///
/// # Example
///
/// ```rust,ignore
/// let mut manager = TestEngineManager::new_temp();
/// manager.engine.record_response("card-1", true, None)?;
///
/// // Drop and reload everything from disk
/// manager.reopen();
/// ```
pub struct TestEngineManager {
    /// The engine under test
    pub engine: StudyEngine,
    config: EngineConfig,
    /// Kept alive so the database outlives the engine
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestEngineManager {
    /// Engine with the default configuration over a fresh database
    pub fn new_temp() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_studyplan.db");
        let engine = open_engine(&db_path, config.clone());

        Self {
            engine,
            config,
            _temp_dir: temp_dir,
            db_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Replace the engine with one freshly loaded from the same database
    pub fn reopen(&mut self) {
        self.engine = open_engine(&self.db_path, self.config.clone());
    }

    /// A second handle on the database, for inspecting raw blobs
    pub fn raw_store(&self) -> SqliteStore {
        SqliteStore::new(Some(self.db_path.clone())).expect("Failed to open raw store")
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Answer each card following `pattern`, one pass per pattern entry
    pub fn seed_reviews(&self, card_ids: &[&str], pattern: &[bool], now: DateTime<Utc>) {
        for &correct in pattern {
            for id in card_ids {
                self.engine
                    .record_response(id, correct, Some(now))
                    .expect("Failed to seed review");
            }
        }
    }

    pub fn seed_metrics(&self, metrics: Vec<StudyMetric>) -> usize {
        let count = metrics.len();
        for metric in metrics {
            self.engine
                .add_study_metric(metric)
                .expect("Failed to seed metric");
        }
        count
    }
}

fn open_engine(path: &Path, config: EngineConfig) -> StudyEngine {
    let store = SqliteStore::new(Some(path.to_path_buf())).expect("Failed to create test store");
    StudyEngine::open(store, config).expect("Failed to open test engine")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_temp_engine_creation() {
        let manager = TestEngineManager::new_temp();
        assert!(manager.path().exists());
        assert!(manager.engine.metrics().unwrap().is_empty());
    }

    #[test]
    fn test_seed_reviews_survive_reopen() {
        let mut manager = TestEngineManager::new_temp();
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        manager.seed_reviews(&["a", "b"], &[true, false], now);

        manager.reopen();
        let state = manager.engine.review_state("a").unwrap().unwrap();
        assert_eq!(state.correct, 1);
        assert_eq!(state.incorrect, 1);
        assert_eq!(
            manager.raw_store().keys().unwrap(),
            vec!["flashcard_history".to_string()]
        );
    }
}
