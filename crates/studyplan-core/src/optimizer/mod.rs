//! Study-Time Optimizer
//!
//! Learns from completed study sessions:
//! - An append-only log of (subject, study time, performance, fatigue)
//! - A per-subject "effective duration": study time averaged with weights
//!   favouring high performance and low fatigue
//! - Duration predictions that blend that history with a difficulty baseline
//! - A best-time-of-day recommendation from performance by hour

mod time_of_day;

pub use time_of_day::{best_time_of_day, bucket_averages, TimeBuckets};

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{ScheduleEntry, Subject, TimeOfDay};
use crate::planner::distribute_weighted;

// ============================================================================
// STUDY METRIC
// ============================================================================

/// One observed study outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMetric {
    pub subject_id: String,
    /// Hours studied
    pub study_time: f64,
    /// 0-100
    pub performance: f64,
    /// 0-100
    pub fatigue: f64,
    /// Learner's local wall-clock time
    pub timestamp: NaiveDateTime,
}

impl StudyMetric {
    /// Create a metric; performance and fatigue are clamped into 0-100.
    pub fn new(
        subject_id: impl Into<String>,
        study_time: f64,
        performance: f64,
        fatigue: f64,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            study_time: study_time.max(0.0),
            performance: performance.clamp(0.0, 100.0),
            fatigue: fatigue.clamp(0.0, 100.0),
            timestamp,
        }
    }

    /// How much this observation counts: high performance, low fatigue
    pub fn quality_weight(&self) -> f64 {
        (self.performance / 100.0) * (1.0 - self.fatigue / 100.0)
    }
}

// ============================================================================
// OPTIMIZER CONFIG
// ============================================================================

/// Configuration for the study-time optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Baseline hours per difficulty point
    pub base_hours_per_difficulty: f64,
    /// Share of the learned duration in a blended prediction
    pub history_weight: f64,
    /// Observations needed before recommending a time of day
    pub min_metrics_for_time_of_day: usize,
    /// Bucket averages closer than this count as equal
    pub near_equal_threshold: f64,
    pub buckets: TimeBuckets,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            base_hours_per_difficulty: 0.5,
            history_weight: 0.7,
            min_metrics_for_time_of_day: 5,
            near_equal_threshold: 10.0,
            buckets: TimeBuckets::default(),
        }
    }
}

// ============================================================================
// STUDY OPTIMIZER
// ============================================================================

/// Online model of how long each subject is best studied
#[derive(Debug, Clone, Default)]
pub struct StudyOptimizer {
    config: OptimizerConfig,
    metrics: Vec<StudyMetric>,
    weights: HashMap<String, f64>,
}

impl StudyOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            config,
            metrics: Vec::new(),
            weights: HashMap::new(),
        }
    }

    /// Rebuild from a persisted log.
    ///
    /// Weights of subjects present in `metrics` are recomputed from the log;
    /// stored weights only fill in subjects the log has no entries for.
    pub fn restore(
        config: OptimizerConfig,
        metrics: Vec<StudyMetric>,
        weights: Option<HashMap<String, f64>>,
    ) -> Self {
        let mut optimizer = Self {
            config,
            metrics,
            weights: weights.unwrap_or_default(),
        };
        optimizer.recompute_weights();
        optimizer
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &[StudyMetric] {
        &self.metrics
    }

    pub fn weights(&self) -> &HashMap<String, f64> {
        &self.weights
    }

    /// Learned effective duration of a subject, if it has usable history
    pub fn weight(&self, subject_id: &str) -> Option<f64> {
        self.weights.get(subject_id).copied()
    }

    /// Append an observation and refresh the per-subject weights.
    pub fn add_metric(&mut self, metric: StudyMetric) {
        tracing::debug!(
            subject_id = %metric.subject_id,
            study_time = metric.study_time,
            performance = metric.performance,
            "Added study metric"
        );
        self.metrics.push(metric);
        self.recompute_weights();
    }

    /// Feed a completed session back as an observation.
    ///
    /// Returns false (and records nothing) for a session not marked completed.
    pub fn record_completed_session(
        &mut self,
        entry: &ScheduleEntry,
        performance: f64,
        fatigue: f64,
    ) -> bool {
        if !entry.completed {
            return false;
        }
        self.add_metric(StudyMetric::new(
            entry.subject_id.clone(),
            entry.duration,
            performance,
            fatigue,
            entry.date,
        ));
        true
    }

    /// Hours a session of this subject should last.
    ///
    /// Without history this is `difficulty × 0.5`; with history the learned
    /// duration is blended in at 70%.
    pub fn predict_optimal_duration(&self, subject_id: &str, difficulty: f64) -> f64 {
        let base = difficulty * self.config.base_hours_per_difficulty;
        match self.weights.get(subject_id) {
            Some(weight) => {
                weight * self.config.history_weight + base * (1.0 - self.config.history_weight)
            }
            None => base,
        }
    }

    /// Best part of the day according to `metrics`.
    pub fn predict_best_time_of_day(&self, metrics: &[StudyMetric]) -> TimeOfDay {
        best_time_of_day(
            metrics,
            &self.config.buckets,
            self.config.min_metrics_for_time_of_day,
            self.config.near_equal_threshold,
        )
    }

    /// Hour budgets weighted by predicted duration instead of raw difficulty.
    ///
    /// Matches the plain difficulty split while no subject has history.
    pub fn biased_budgets(&self, subjects: &[Subject], total_hours: f64) -> HashMap<String, u32> {
        let weights: Vec<(&str, f64)> = subjects
            .iter()
            .map(|s| {
                let predicted = self.predict_optimal_duration(&s.id, f64::from(s.difficulty));
                (s.id.as_str(), predicted)
            })
            .collect();
        distribute_weighted(&weights, total_hours)
    }

    fn recompute_weights(&mut self) {
        let mut sums: HashMap<&str, (f64, f64)> = HashMap::new();
        for metric in &self.metrics {
            let w = metric.quality_weight();
            let entry = sums.entry(metric.subject_id.as_str()).or_insert((0.0, 0.0));
            entry.0 += metric.study_time * w;
            entry.1 += w;
        }

        // Only subjects in the log are touched
        for (id, (numerator, denominator)) in sums {
            if denominator > 0.0 {
                self.weights.insert(id.to_string(), numerator / denominator);
            } else {
                self.weights.remove(id);
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
