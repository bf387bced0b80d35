//! Spaced-Repetition Tracker
//!
//! SM-2 style review state per flashcard id:
//! - Correct answers graduate a card from 1 to 6 days, then grow the interval
//!   by the ease factor and nudge the ease factor up
//! - Incorrect answers reset the interval to 1 day and lower the ease factor,
//!   never below its floor
//! - The next review is always counted from the moment of the answer

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::model::CardRef;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ease factor of a card seen for the first time
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor a card can reach
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval (days) of a new or lapsed card
pub const INITIAL_INTERVAL_DAYS: u32 = 1;

/// Interval (days) after the first successful recall
pub const GRADUATION_INTERVAL_DAYS: u32 = 6;

/// Difficulty reported for a card without answers
pub const UNKNOWN_DIFFICULTY: f64 = 0.5;

// ============================================================================
// REVIEW CONFIG
// ============================================================================

/// Tunables of the review update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub initial_ease_factor: f64,
    pub min_ease_factor: f64,
    pub graduation_interval_days: u32,
    /// Added to the ease factor after a correct answer
    pub ease_bonus: f64,
    /// Removed from the ease factor after an incorrect answer
    pub ease_penalty: f64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            initial_ease_factor: DEFAULT_EASE_FACTOR,
            min_ease_factor: MIN_EASE_FACTOR,
            graduation_interval_days: GRADUATION_INTERVAL_DAYS,
            ease_bonus: 0.1,
            ease_penalty: 0.2,
        }
    }
}

// ============================================================================
// REVIEW STATE
// ============================================================================

/// Review history of one flashcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardReviewState {
    pub correct: u32,
    pub incorrect: u32,
    /// Days until the next review, at least 1
    pub interval: u32,
    pub ease_factor: f64,
    pub next_review: DateTime<Utc>,
}

impl FlashcardReviewState {
    fn fresh(config: &ReviewConfig, now: DateTime<Utc>) -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            interval: INITIAL_INTERVAL_DAYS,
            ease_factor: config.initial_ease_factor.max(config.min_ease_factor),
            next_review: now,
        }
    }

    /// Total recorded answers
    pub fn responses(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Whether the card should be shown at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Share of incorrect answers, 0.5 without history
    pub fn difficulty(&self) -> f64 {
        match self.responses() {
            0 => UNKNOWN_DIFFICULTY,
            total => 1.0 - f64::from(self.correct) / f64::from(total),
        }
    }
}

// ============================================================================
// REVIEW TRACKER
// ============================================================================

/// Per-card review states keyed by flashcard id
#[derive(Debug, Clone, Default)]
pub struct ReviewTracker {
    config: ReviewConfig,
    states: HashMap<String, FlashcardReviewState>,
}

impl ReviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReviewConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    /// Rebuild a tracker from persisted `(id, state)` pairs
    pub fn from_snapshot(config: ReviewConfig, snapshot: Vec<(String, FlashcardReviewState)>) -> Self {
        Self {
            config,
            states: snapshot.into_iter().collect(),
        }
    }

    /// All states as `(id, state)` pairs, sorted by id
    pub fn snapshot(&self) -> Vec<(String, FlashcardReviewState)> {
        let mut pairs: Vec<_> = self
            .states
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, card_id: &str) -> Option<&FlashcardReviewState> {
        self.states.get(card_id)
    }

    /// Drop the history of a card the caller no longer keeps
    pub fn forget(&mut self, card_id: &str) -> Option<FlashcardReviewState> {
        self.states.remove(card_id)
    }

    /// Apply one answer to a card and return its new state.
    pub fn record_response(
        &mut self,
        card_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> FlashcardReviewState {
        let config = &self.config;
        let state = self
            .states
            .entry(card_id.to_string())
            .or_insert_with(|| FlashcardReviewState::fresh(config, now));

        if is_correct {
            state.correct += 1;
            state.interval = if state.interval == INITIAL_INTERVAL_DAYS {
                config.graduation_interval_days.max(INITIAL_INTERVAL_DAYS)
            } else {
                grow_interval(state.interval, state.ease_factor)
            };
            state.ease_factor += config.ease_bonus;
        } else {
            state.incorrect += 1;
            state.interval = INITIAL_INTERVAL_DAYS;
            state.ease_factor = (state.ease_factor - config.ease_penalty).max(config.min_ease_factor);
        }

        state.next_review = calendar::add_days(now, state.interval);

        tracing::debug!(
            card_id,
            is_correct,
            interval = state.interval,
            ease_factor = state.ease_factor,
            "Recorded flashcard response"
        );

        state.clone()
    }

    /// Cards due at `now`, in input order. Cards without history are always due.
    pub fn due_cards<'a, C: CardRef>(&self, cards: &'a [C], now: DateTime<Utc>) -> Vec<&'a C> {
        cards
            .iter()
            .filter(|card| {
                self.states
                    .get(card.card_id())
                    .is_none_or(|state| state.is_due(now))
            })
            .collect()
    }

    /// `1 - correct / total`, or 0.5 for a card without answers
    pub fn difficulty(&self, card_id: &str) -> f64 {
        self.states
            .get(card_id)
            .map_or(UNKNOWN_DIFFICULTY, FlashcardReviewState::difficulty)
    }
}

fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval) * ease_factor).round();
    if grown.is_finite() {
        (grown.min(f64::from(u32::MAX)) as u32).max(INITIAL_INTERVAL_DAYS)
    } else {
        interval
    }
}

// ============================================================================
// TESTS
// ============================================================================
