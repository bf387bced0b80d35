//! Review Module
//!
//! SM-2 style spaced repetition for flashcards. The tracker only keeps
//! per-id state; the cards themselves stay with the caller.

mod tracker;

pub use tracker::{
    FlashcardReviewState, ReviewConfig, ReviewTracker, DEFAULT_EASE_FACTOR,
    GRADUATION_INTERVAL_DAYS, INITIAL_INTERVAL_DAYS, MIN_EASE_FACTOR, UNKNOWN_DIFFICULTY,
};
