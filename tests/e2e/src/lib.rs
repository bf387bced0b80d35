//! Studyplan end-to-end test support
//!
//! - `harness`: isolated engines over temporary SQLite stores
//! - `mocks`: factories for subjects, flashcards and study metrics

pub mod harness;
pub mod mocks;

pub use harness::TestEngineManager;
pub use mocks::{TestDataFactory, TestScenario};
