//! Timeline views over a generated schedule
//!
//! Read-side helpers the host uses to display and maintain a plan: per-day
//! grouping, completion progress, and cascading removal of a subject.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::ScheduleEntry;

/// Set the completion flag of the session with `id`.
///
/// Returns false when no session has that id.
pub fn mark_completed(entries: &mut [ScheduleEntry], id: &str, completed: bool) -> bool {
    match entries.iter_mut().find(|e| e.id == id) {
        Some(entry) => {
            entry.completed = completed;
            true
        }
        None => false,
    }
}

/// Sessions grouped by calendar day, days in ascending order.
pub fn group_by_day(entries: &[ScheduleEntry]) -> BTreeMap<NaiveDate, Vec<&ScheduleEntry>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.day()).or_default().push(entry);
    }
    groups
}

/// Drop every session of a deleted subject. Returns how many were removed.
pub fn remove_subject(entries: &mut Vec<ScheduleEntry>, subject_id: &str) -> usize {
    let before = entries.len();
    entries.retain(|e| e.subject_id != subject_id);
    before - entries.len()
}

/// Incomplete sessions starting at or after `now`, earliest first.
pub fn upcoming(entries: &[ScheduleEntry], now: NaiveDateTime) -> Vec<&ScheduleEntry> {
    let mut pending: Vec<&ScheduleEntry> = entries
        .iter()
        .filter(|e| !e.completed && e.date >= now)
        .collect();
    pending.sort_by_key(|e| e.date);
    pending
}

/// Completion summary of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage, 0 for an empty schedule
    pub completion_percent: u32,
    pub next_session: Option<ScheduleEntry>,
}

impl ScheduleProgress {
    pub fn from_entries(entries: &[ScheduleEntry], now: NaiveDateTime) -> Self {
        let total = entries.len();
        let completed = entries.iter().filter(|e| e.completed).count();
        let completion_percent = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            completed,
            total,
            completion_percent,
            next_session: upcoming(entries, now).first().map(|e| (*e).clone()),
        }
    }
}
