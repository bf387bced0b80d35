//! Best time of day
//!
//! Buckets past study outcomes by the hour they were recorded and picks the
//! part of the day with the best average performance. These buckets are
//! independent of the planner's session start hours.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use super::StudyMetric;
use crate::model::TimeOfDay;

/// Hour boundaries of the performance buckets.
///
/// Morning is `[morning_start, afternoon_start)`, afternoon is
/// `[afternoon_start, evening_start)`, everything else is evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBuckets {
    pub morning_start: u32,
    pub afternoon_start: u32,
    pub evening_start: u32,
}

impl Default for TimeBuckets {
    fn default() -> Self {
        Self {
            morning_start: 5,
            afternoon_start: 12,
            evening_start: 18,
        }
    }
}

impl TimeBuckets {
    /// Bucket of an hour of the day (never `Distributed`)
    pub fn classify(&self, hour: u32) -> TimeOfDay {
        if hour >= self.morning_start && hour < self.afternoon_start {
            TimeOfDay::Morning
        } else if hour >= self.afternoon_start && hour < self.evening_start {
            TimeOfDay::Afternoon
        } else {
            TimeOfDay::Evening
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    sum: f64,
    count: u32,
}

impl Bucket {
    fn add(&mut self, performance: f64) {
        self.sum += performance;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

/// Average performance per bucket: `[morning, afternoon, evening]`
pub fn bucket_averages(metrics: &[StudyMetric], buckets: &TimeBuckets) -> [f64; 3] {
    let mut acc = [Bucket::default(); 3];
    for metric in metrics {
        let slot = match buckets.classify(metric.timestamp.hour()) {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            _ => 2,
        };
        acc[slot].add(metric.performance);
    }
    [acc[0].average(), acc[1].average(), acc[2].average()]
}

/// Pick the bucket with the best average performance.
///
/// Returns `Distributed` with fewer than `min_metrics` observations, or when
/// every pair of bucket averages is closer than `near_equal_threshold`. Ties
/// go to the earlier part of the day.
pub fn best_time_of_day(
    metrics: &[StudyMetric],
    buckets: &TimeBuckets,
    min_metrics: usize,
    near_equal_threshold: f64,
) -> TimeOfDay {
    if metrics.len() < min_metrics {
        return TimeOfDay::Distributed;
    }

    let [morning, afternoon, evening] = bucket_averages(metrics, buckets);

    let near_equal = (morning - afternoon).abs() < near_equal_threshold
        && (afternoon - evening).abs() < near_equal_threshold
        && (morning - evening).abs() < near_equal_threshold;
    if near_equal {
        return TimeOfDay::Distributed;
    }

    let max = morning.max(afternoon).max(evening);
    if max == morning {
        TimeOfDay::Morning
    } else if max == afternoon {
        TimeOfDay::Afternoon
    } else {
        TimeOfDay::Evening
    }
}
