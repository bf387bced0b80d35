//! Subject - a course the learner is preparing an exam for

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Lowest accepted difficulty rating
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest accepted difficulty rating
pub const MAX_DIFFICULTY: u8 = 5;

/// A subject with an exam deadline and a difficulty weight.
///
/// `time_to_spend` is written back by the planner: it holds the hour budget
/// computed for the most recent planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub exam_date: NaiveDate,
    /// 1 (easy) to 5 (hard)
    pub difficulty: u8,
    #[serde(default)]
    pub time_to_spend: Option<f64>,
}

impl Subject {
    /// Create a subject; difficulty is clamped into `1..=5`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        exam_date: NaiveDate,
        difficulty: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            exam_date,
            difficulty: difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            time_to_spend: None,
        }
    }

    /// Days left until the exam, negative once it has passed
    pub fn days_until_exam(&self, today: NaiveDate) -> i64 {
        calendar::days_until(today, self.exam_date)
    }

    /// Whether sessions may still be placed on `date`
    pub fn accepts_sessions_on(&self, date: NaiveDate) -> bool {
        date <= self.exam_date
    }
}
