//! Calendar and duration helpers
//!
//! Pure date arithmetic shared by the planner, the review tracker and the
//! optimizer. Nothing in here reads the wall clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Last hour a session may start at without rolling onto the next day
pub const LAST_START_HOUR: u32 = 23;

/// Whole days between two dates, regardless of argument order.
pub fn day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs()
}

/// Signed number of days from `today` until `date` (negative once passed).
pub fn days_until(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Every calendar date from `start` to `end`, both inclusive.
///
/// Yields nothing when `end` is before `start`.
pub fn planning_days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Session start on `date` at `hour:00`, clamped to [`LAST_START_HOUR`].
pub fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour.min(LAST_START_HOUR), 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// Round to the nearest half hour.
pub fn round_half_hour(hours: f64) -> f64 {
    (hours * 2.0).round() / 2.0
}

/// Round to the nearest whole hour; negative or non-finite input yields 0.
pub fn round_hours(hours: f64) -> u32 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    hours.round().min(u32::MAX as f64) as u32
}

/// `instant` moved forward by `days`, saturating at the representable maximum.
pub fn add_days(instant: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    instant
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
