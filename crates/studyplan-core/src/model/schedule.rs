//! ScheduleEntry - one planned study session

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deterministic session ids
const SESSION_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a8e_4b7d_5e90_a3c4_1d2e_3f40_5a6b);

/// A planned study session for one subject.
///
/// `subject_id` is a weak reference; nothing here checks that the subject
/// still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub subject_id: String,
    /// Local wall-clock start of the session
    pub date: NaiveDateTime,
    /// Hours, always a multiple of 0.5
    pub duration: f64,
    #[serde(default)]
    pub completed: bool,
}

impl ScheduleEntry {
    /// Create an incomplete session. The id is derived from subject and start
    /// time, so planning the same input twice yields the same ids.
    pub fn new(subject_id: impl Into<String>, date: NaiveDateTime, duration: f64) -> Self {
        let subject_id = subject_id.into();
        let id = session_id(&subject_id, date);
        Self {
            id,
            subject_id,
            date,
            duration,
            completed: false,
        }
    }

    /// Calendar day the session falls on
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

fn session_id(subject_id: &str, date: NaiveDateTime) -> String {
    let name = format!("{}@{}", subject_id, date.format("%Y-%m-%dT%H:%M"));
    Uuid::new_v5(&SESSION_NAMESPACE, name.as_bytes()).to_string()
}
