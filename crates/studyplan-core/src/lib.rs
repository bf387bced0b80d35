//! # Studyplan Core
//!
//! Study planning engine for exam preparation:
//!
//! - **Hour Distribution**: Split a study budget across subjects by difficulty
//! - **Session Planning**: Day-by-day sessions that stop at each subject's exam
//! - **Spaced Repetition**: SM-2 style flashcard intervals with ease factors
//! - **Study-Time Optimizer**: Learn effective session lengths and the best
//!   time of day from past study outcomes
//! - **Persistence**: JSON blobs in SQLite (optionally SQLCipher) or in memory
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chrono::NaiveDate;
//! use studyplan_core::{EngineConfig, PlanRequest, SqliteStore, StudyEngine, Subject, TimeOfDay};
//!
//! // Open the engine over the default platform-specific database
//! let engine = StudyEngine::open(SqliteStore::new(None)?, EngineConfig::default())?;
//!
//! let exam = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
//! let mut subjects = vec![
//!     Subject::new("calc", "Calculus", exam, 5),
//!     Subject::new("hist", "History", exam, 2),
//! ];
//! let request = PlanRequest::new(
//!     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 6, 19).unwrap(),
//!     3.0,
//!     TimeOfDay::Morning,
//! );
//!
//! // Plan, then feed outcomes back so later plans adapt
//! let schedule = engine.generate_adaptive_schedule(&mut subjects, &request)?;
//!
//! // Review a flashcard
//! let state = engine.record_response("card-1", true, None)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): Bundled SQLite for [`SqliteStore`]
//! - `encryption`: SQLCipher instead; the key is read from
//!   `STUDYPLAN_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod calendar;
pub mod engine;
pub mod model;
pub mod optimizer;
pub mod planner;
pub mod review;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Domain types
pub use model::{CardRef, Flashcard, ScheduleEntry, Subject, TimeOfDay};

// Planning
pub use planner::{
    distribute_hours, generate_schedule, DistributedPlacement, PlanError, PlanRequest,
    PlannerConfig, ScheduleProgress, SessionPlanner,
};

// Flashcard review
pub use review::{FlashcardReviewState, ReviewConfig, ReviewTracker};

// Study-time optimizer
pub use optimizer::{OptimizerConfig, StudyMetric, StudyOptimizer, TimeBuckets};

// Persistence
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};

// Engine facade
pub use engine::{EngineConfig, EngineError, StudyEngine};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        EngineConfig, EngineError, Flashcard, KeyValueStore, MemoryStore, PlanRequest,
        ScheduleEntry, SessionPlanner, SqliteStore, StudyEngine, StudyMetric, Subject, TimeOfDay,
    };
}
