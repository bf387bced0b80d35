//! Session Planner
//!
//! Walks the planning window one day at a time and turns per-subject hour
//! budgets into concrete study sessions:
//!
//! 1. **Budget**: distribute `days × daily_hours` across subjects by difficulty
//! 2. **Order**: nearer exams first
//! 3. **Daily split**: each day's hours are shared evenly by the subjects that
//!    still have budget and whose exam has not passed
//! 4. **Placement**: sessions get a start hour from the time-of-day policy

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::distributor::distribute_hours;
use crate::calendar;
use crate::model::{ScheduleEntry, Subject, TimeOfDay};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Planning error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlanError {
    /// The end date does not come after the start date
    #[error("Invalid planning range: end date {end} must be after start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Daily hours negative or not a number
    #[error("Invalid daily hours: {0}")]
    InvalidDailyHours(f64),
}

/// Planning result type
pub type Result<T> = std::result::Result<T, PlanError>;

// ============================================================================
// PLANNER CONFIG
// ============================================================================

/// How `distributed` sessions are spread over the day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DistributedPlacement {
    /// `base_hour + (index × step_hours) mod window_hours`
    Rotating {
        base_hour: u32,
        step_hours: u32,
        window_hours: u32,
    },
    /// Spread the day's sessions evenly from `first_hour` to `last_hour`
    EvenSpread { first_hour: u32, last_hour: u32 },
}

impl Default for DistributedPlacement {
    fn default() -> Self {
        DistributedPlacement::Rotating {
            base_hour: 9,
            step_hours: 4,
            window_hours: 12,
        }
    }
}

impl DistributedPlacement {
    /// Start hour for the `index`-th of `count` sessions on one day
    pub fn start_hour(&self, index: usize, count: usize) -> u32 {
        match *self {
            DistributedPlacement::Rotating {
                base_hour,
                step_hours,
                window_hours,
            } => {
                if window_hours == 0 {
                    return base_hour;
                }
                let step = (index as u64 * u64::from(step_hours)) % u64::from(window_hours);
                base_hour.saturating_add(step as u32)
            }
            DistributedPlacement::EvenSpread {
                first_hour,
                last_hour,
            } => {
                if count <= 1 || last_hour <= first_hour {
                    return first_hour;
                }
                let span = u64::from(last_hour - first_hour);
                let offset = index as u64 * span / (count as u64 - 1);
                first_hour.saturating_add(offset.min(span) as u32)
            }
        }
    }
}

/// Configuration for the session planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// First session hour for `morning`
    pub morning_start_hour: u32,
    /// First session hour for `afternoon`
    pub afternoon_start_hour: u32,
    /// First session hour for `evening`
    pub evening_start_hour: u32,
    /// Placement policy for `distributed`
    pub distributed: DistributedPlacement,
    /// Count the end date when sizing the hour budget
    ///
    /// Off by default: the budget uses the whole-day span `end - start`, while
    /// sessions are still placed on every date from start to end.
    pub inclusive_budget_days: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            morning_start_hour: 9,
            afternoon_start_hour: 13,
            evening_start_hour: 18,
            distributed: DistributedPlacement::default(),
            inclusive_budget_days: false,
        }
    }
}

// ============================================================================
// PLAN REQUEST
// ============================================================================

/// Planning window and learner preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_hours: f64,
    #[serde(default)]
    pub preferred_time_of_day: TimeOfDay,
}

impl PlanRequest {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        daily_hours: f64,
        preferred_time_of_day: TimeOfDay,
    ) -> Self {
        Self {
            start_date,
            end_date,
            daily_hours,
            preferred_time_of_day,
        }
    }

    /// Check the caller preconditions: start before end, sane daily hours
    pub fn validate(&self) -> Result<()> {
        if self.start_date >= self.end_date {
            return Err(PlanError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !self.daily_hours.is_finite() || self.daily_hours < 0.0 {
            return Err(PlanError::InvalidDailyHours(self.daily_hours));
        }
        Ok(())
    }
}

// ============================================================================
// SESSION PLANNER
// ============================================================================

/// Deterministic study-session planner
#[derive(Debug, Clone, Default)]
pub struct SessionPlanner {
    config: PlannerConfig,
}

impl SessionPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Total hours available in the window
    pub fn available_hours(&self, request: &PlanRequest) -> f64 {
        let mut days = calendar::day_span(request.start_date, request.end_date);
        if self.config.inclusive_budget_days {
            days += 1;
        }
        days as f64 * request.daily_hours
    }

    /// Budget hours by difficulty, write them into `time_to_spend`, and plan.
    ///
    /// The budget is `daily_hours × (end - start)` days, so the end date adds
    /// no hours, yet sessions are still placed on it. Set
    /// [`PlannerConfig::inclusive_budget_days`] to count the end date as well.
    ///
    /// Fails fast on an invalid request; an empty subject list yields an empty
    /// schedule.
    pub fn generate_schedule(
        &self,
        subjects: &mut [Subject],
        request: &PlanRequest,
    ) -> Result<Vec<ScheduleEntry>> {
        request.validate()?;
        if subjects.is_empty() {
            return Ok(Vec::new());
        }

        let budgets = distribute_hours(subjects, self.available_hours(request));
        self.plan_with_budgets(subjects, request, &budgets)
    }

    /// Plan with budgets computed elsewhere (e.g. biased by study history).
    ///
    /// Subjects missing from `budgets` get no hours.
    pub fn plan_with_budgets(
        &self,
        subjects: &mut [Subject],
        request: &PlanRequest,
        budgets: &HashMap<String, u32>,
    ) -> Result<Vec<ScheduleEntry>> {
        for subject in subjects.iter_mut() {
            let hours = budgets.get(&subject.id).copied().unwrap_or(0);
            subject.time_to_spend = Some(f64::from(hours));
        }
        self.plan_preset(subjects, request)
    }

    /// Plan with the budgets already stored in each subject's `time_to_spend`.
    pub fn plan_preset(
        &self,
        subjects: &[Subject],
        request: &PlanRequest,
    ) -> Result<Vec<ScheduleEntry>> {
        request.validate()?;

        let mut order: Vec<&Subject> = subjects.iter().collect();
        order.sort_by_key(|s| s.exam_date);

        let mut remaining: Vec<f64> = order
            .iter()
            .map(|s| s.time_to_spend.unwrap_or(0.0))
            .collect();

        let mut entries = Vec::new();

        for day in calendar::planning_days(request.start_date, request.end_date) {
            let candidates: Vec<usize> = (0..order.len())
                .filter(|&i| remaining[i] > 0.0 && order[i].accepts_sessions_on(day))
                .collect();

            if candidates.is_empty() {
                continue;
            }

            let share = request.daily_hours / candidates.len() as f64;
            let mut day_left = request.daily_hours;

            for (index, &i) in candidates.iter().enumerate() {
                let hours = calendar::round_half_hour(remaining[i].min(share));
                if hours <= 0.0 {
                    continue;
                }

                let hour = self.start_hour(request.preferred_time_of_day, index, candidates.len());
                entries.push(ScheduleEntry::new(
                    order[i].id.clone(),
                    calendar::at_hour(day, hour),
                    hours,
                ));

                remaining[i] -= hours;
                day_left -= hours;
            }

            tracing::trace!(%day, sessions = candidates.len(), day_left, "Planned day");
        }

        tracing::debug!(
            subjects = subjects.len(),
            sessions = entries.len(),
            start = %request.start_date,
            end = %request.end_date,
            "Generated study schedule"
        );

        Ok(entries)
    }

    fn start_hour(&self, preference: TimeOfDay, index: usize, count: usize) -> u32 {
        let offset = u32::try_from(index).unwrap_or(u32::MAX);
        match preference {
            TimeOfDay::Morning => self.config.morning_start_hour.saturating_add(offset),
            TimeOfDay::Afternoon => self.config.afternoon_start_hour.saturating_add(offset),
            TimeOfDay::Evening => self.config.evening_start_hour.saturating_add(offset),
            TimeOfDay::Distributed => self.config.distributed.start_hour(index, count),
        }
    }
}

/// Plan with the default configuration.
pub fn generate_schedule(
    subjects: &mut [Subject],
    request: &PlanRequest,
) -> Result<Vec<ScheduleEntry>> {
    SessionPlanner::new().generate_schedule(subjects, request)
}

// ============================================================================
// TESTS
// ============================================================================
