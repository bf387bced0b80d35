//! Hour Distributor
//!
//! Splits a total hour budget across subjects in proportion to their
//! difficulty. Each share is rounded to a whole hour on its own, so the
//! rounded shares may drift from the total by up to half an hour per subject.

use std::collections::HashMap;

use crate::calendar;
use crate::model::Subject;

/// Allocate `total_hours` across `subjects` proportionally to difficulty.
///
/// Returns an empty map for an empty list. Negative or non-finite totals are
/// treated as zero.
pub fn distribute_hours(subjects: &[Subject], total_hours: f64) -> HashMap<String, u32> {
    let weights: Vec<(&str, f64)> = subjects
        .iter()
        .map(|s| (s.id.as_str(), f64::from(s.difficulty)))
        .collect();
    distribute_weighted(&weights, total_hours)
}

/// Allocate `total_hours` proportionally to arbitrary non-negative weights.
///
/// Weights that are negative or non-finite count as zero. When every weight is
/// zero nobody receives hours.
pub fn distribute_weighted(weights: &[(&str, f64)], total_hours: f64) -> HashMap<String, u32> {
    let total = sanitize(total_hours);
    let weight_sum: f64 = weights.iter().map(|(_, w)| sanitize(*w)).sum();

    if weight_sum <= 0.0 {
        if !weights.is_empty() {
            tracing::warn!(
                subjects = weights.len(),
                "Total weight is zero; allocating no hours"
            );
        }
        return weights.iter().map(|(id, _)| (id.to_string(), 0)).collect();
    }

    weights
        .iter()
        .map(|(id, w)| {
            let share = sanitize(*w) / weight_sum * total;
            (id.to_string(), calendar::round_hours(share))
        })
        .collect()
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
