//! Study Engine
//!
//! Shared service facade over the planner, the review tracker and the
//! optimizer. State lives behind one mutex per component and is written to a
//! [`KeyValueStore`] after every mutation, so the engine can sit in an `Arc`
//! and be used from several threads.
//!
//! A failed save leaves the in-memory state updated; call
//! [`StudyEngine::persist`] to retry.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{CardRef, ScheduleEntry, Subject, TimeOfDay};
use crate::optimizer::{OptimizerConfig, StudyMetric, StudyOptimizer};
use crate::planner::{PlanError, PlanRequest, PlannerConfig, SessionPlanner};
use crate::review::{FlashcardReviewState, ReviewConfig, ReviewTracker};
use crate::storage::{KeyValueStore, MemoryStore, StorageError};

/// Store key of the flashcard review states
pub const FLASHCARD_HISTORY_KEY: &str = "flashcard_history";

/// Store key of the study metric log
pub const STUDY_METRICS_KEY: &str = "study_metrics";

/// Store key of the learned per-subject durations
pub const SUBJECT_WEIGHTS_KEY: &str = "subject_weights";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Persisting or loading state failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Planning request rejected
    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),
    /// A component mutex was poisoned by a panicking thread
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Configuration for every engine component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub planner: PlannerConfig,
    pub review: ReviewConfig,
    pub optimizer: OptimizerConfig,
}

// ============================================================================
// STUDY ENGINE
// ============================================================================

pub struct StudyEngine {
    planner: SessionPlanner,
    tracker: Mutex<ReviewTracker>,
    optimizer: Mutex<StudyOptimizer>,
    store: Box<dyn KeyValueStore>,
}

impl StudyEngine {
    /// Load state from `store` and build the engine.
    ///
    /// Blobs that cannot be decoded are logged and replaced by empty state;
    /// only store failures are returned as errors.
    pub fn open(store: impl KeyValueStore + 'static, config: EngineConfig) -> Result<Self> {
        let store: Box<dyn KeyValueStore> = Box::new(store);

        let history: Vec<(String, FlashcardReviewState)> =
            load_blob(store.as_ref(), FLASHCARD_HISTORY_KEY)?.unwrap_or_default();
        let metrics: Vec<StudyMetric> =
            load_blob(store.as_ref(), STUDY_METRICS_KEY)?.unwrap_or_default();
        let weights: Option<Vec<(String, f64)>> = load_blob(store.as_ref(), SUBJECT_WEIGHTS_KEY)?;

        tracing::info!(
            cards = history.len(),
            metrics = metrics.len(),
            "Study engine loaded"
        );

        let tracker = ReviewTracker::from_snapshot(config.review, history);
        let optimizer = StudyOptimizer::restore(
            config.optimizer,
            metrics,
            weights.map(|pairs| pairs.into_iter().collect()),
        );

        Ok(Self {
            planner: SessionPlanner::with_config(config.planner),
            tracker: Mutex::new(tracker),
            optimizer: Mutex::new(optimizer),
            store,
        })
    }

    /// Engine over a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self {
            planner: SessionPlanner::new(),
            tracker: Mutex::new(ReviewTracker::new()),
            optimizer: Mutex::new(StudyOptimizer::new()),
            store: Box::new(MemoryStore::new()),
        }
    }

    pub fn planner(&self) -> &SessionPlanner {
        &self.planner
    }

    // ========================================================================
    // PLANNING
    // ========================================================================

    /// Plan with the plain difficulty split
    pub fn generate_schedule(
        &self,
        subjects: &mut [Subject],
        request: &PlanRequest,
    ) -> Result<Vec<ScheduleEntry>> {
        Ok(self.planner.generate_schedule(subjects, request)?)
    }

    /// Plan with budgets biased by the learned study durations
    pub fn generate_adaptive_schedule(
        &self,
        subjects: &mut [Subject],
        request: &PlanRequest,
    ) -> Result<Vec<ScheduleEntry>> {
        request.validate()?;
        if subjects.is_empty() {
            return Ok(Vec::new());
        }
        let total = self.planner.available_hours(request);
        let budgets = self.optimizer()?.biased_budgets(subjects, total);
        Ok(self.planner.plan_with_budgets(subjects, request, &budgets)?)
    }

    // ========================================================================
    // FLASHCARD REVIEW
    // ========================================================================

    /// Record an answer; `now` defaults to the wall clock.
    pub fn record_response(
        &self,
        card_id: &str,
        is_correct: bool,
        now: Option<DateTime<Utc>>,
    ) -> Result<FlashcardReviewState> {
        let now = now.unwrap_or_else(Utc::now);
        let mut tracker = self.tracker()?;
        let state = tracker.record_response(card_id, is_correct, now);
        self.save_tracker(&tracker)?;
        Ok(state)
    }

    /// Cards due at `now`, in input order
    pub fn due_cards<'a, C: CardRef>(
        &self,
        cards: &'a [C],
        now: DateTime<Utc>,
    ) -> Result<Vec<&'a C>> {
        Ok(self.tracker()?.due_cards(cards, now))
    }

    pub fn flashcard_difficulty(&self, card_id: &str) -> Result<f64> {
        Ok(self.tracker()?.difficulty(card_id))
    }

    pub fn review_state(&self, card_id: &str) -> Result<Option<FlashcardReviewState>> {
        Ok(self.tracker()?.state(card_id).cloned())
    }

    /// Drop the history of deleted cards. Returns how many had history.
    pub fn forget_cards<'a>(&self, card_ids: impl IntoIterator<Item = &'a str>) -> Result<usize> {
        let mut tracker = self.tracker()?;
        let removed = card_ids
            .into_iter()
            .filter(|id| tracker.forget(id).is_some())
            .count();
        if removed > 0 {
            self.save_tracker(&tracker)?;
        }
        Ok(removed)
    }

    // ========================================================================
    // STUDY OPTIMIZER
    // ========================================================================

    pub fn add_study_metric(&self, metric: StudyMetric) -> Result<()> {
        let mut optimizer = self.optimizer()?;
        optimizer.add_metric(metric);
        self.save_optimizer(&optimizer)
    }

    /// Feed a completed session back; incomplete sessions are ignored.
    pub fn record_completed_session(
        &self,
        entry: &ScheduleEntry,
        performance: f64,
        fatigue: f64,
    ) -> Result<bool> {
        let mut optimizer = self.optimizer()?;
        let recorded = optimizer.record_completed_session(entry, performance, fatigue);
        if recorded {
            self.save_optimizer(&optimizer)?;
        }
        Ok(recorded)
    }

    pub fn predict_optimal_duration(&self, subject_id: &str, difficulty: f64) -> Result<f64> {
        Ok(self.optimizer()?.predict_optimal_duration(subject_id, difficulty))
    }

    pub fn predict_best_time_of_day(&self, metrics: &[StudyMetric]) -> Result<TimeOfDay> {
        Ok(self.optimizer()?.predict_best_time_of_day(metrics))
    }

    /// Best time of day judged from the engine's own metric log
    pub fn recommended_time_of_day(&self) -> Result<TimeOfDay> {
        let optimizer = self.optimizer()?;
        Ok(optimizer.predict_best_time_of_day(optimizer.metrics()))
    }

    pub fn metrics(&self) -> Result<Vec<StudyMetric>> {
        Ok(self.optimizer()?.metrics().to_vec())
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Write every component to the store
    pub fn persist(&self) -> Result<()> {
        let tracker = self.tracker()?;
        self.save_tracker(&tracker)?;
        let optimizer = self.optimizer()?;
        self.save_optimizer(&optimizer)
    }

    fn save_tracker(&self, tracker: &ReviewTracker) -> Result<()> {
        let value = serde_json::to_value(tracker.snapshot()).map_err(StorageError::from)?;
        self.store.save(FLASHCARD_HISTORY_KEY, &value)?;
        Ok(())
    }

    fn save_optimizer(&self, optimizer: &StudyOptimizer) -> Result<()> {
        let metrics = serde_json::to_value(optimizer.metrics()).map_err(StorageError::from)?;

        let mut weights: Vec<(&String, &f64)> = optimizer.weights().iter().collect();
        weights.sort_by(|a, b| a.0.cmp(b.0));
        let weights = serde_json::to_value(weights).map_err(StorageError::from)?;

        self.store.save(STUDY_METRICS_KEY, &metrics)?;
        self.store.save(SUBJECT_WEIGHTS_KEY, &weights)?;
        Ok(())
    }

    fn tracker(&self) -> Result<MutexGuard<'_, ReviewTracker>> {
        self.tracker
            .lock()
            .map_err(|_| EngineError::LockPoisoned("Review tracker"))
    }

    fn optimizer(&self) -> Result<MutexGuard<'_, StudyOptimizer>> {
        self.optimizer
            .lock()
            .map_err(|_| EngineError::LockPoisoned("Study optimizer"))
    }
}

/// Load and decode a blob, treating undecodable content as absent.
fn load_blob<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let value = match store.load(key) {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(None),
        Err(StorageError::Serialization(e)) => {
            tracing::warn!("Discarding unreadable {}: {}", key, e);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            tracing::warn!("Discarding malformed {}: {}", key, e);
            Ok(None)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
