//! Model module - Core value types
//!
//! Plain records exchanged with the host application:
//! - Subjects with exam dates and difficulty weights
//! - Schedule entries produced by the planner
//! - Flashcards whose ids key the review tracker
//! - Time-of-day preferences shared by planner and optimizer

mod flashcard;
mod schedule;
mod subject;

pub use flashcard::{CardRef, Flashcard};
pub use schedule::ScheduleEntry;
pub use subject::{MAX_DIFFICULTY, MIN_DIFFICULTY, Subject};

use serde::{Deserialize, Serialize};

// ============================================================================
// TIME OF DAY
// ============================================================================

/// When in the day a learner prefers (or performs best) to study
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    /// Spread sessions across the day
    #[default]
    Distributed,
}

impl TimeOfDay {
    /// All variants, in tie-breaking order
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Distributed,
    ];
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeOfDay::Morning => write!(f, "morning"),
            TimeOfDay::Afternoon => write!(f, "afternoon"),
            TimeOfDay::Evening => write!(f, "evening"),
            TimeOfDay::Distributed => write!(f, "distributed"),
        }
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            "distributed" => Ok(TimeOfDay::Distributed),
            _ => Err(format!("Unknown time of day: {}", s)),
        }
    }
}
