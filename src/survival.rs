//! Survival curve alignment
//!
//! Kaplan-Meier points arrive as one flat, unordered list mixing the high and
//! low expression groups, each group sampled at its own times. The chart needs
//! a single time axis, so [`align_survival_curve`] merges both groups into one
//! ascending series. A group without an observation at a given time gets
//! `None` there; carrying the previous value forward is left to the
//! step-after renderer, which connects across gaps.

use serde::Serialize;

use crate::models::SurvivalPoint;

/// Expression group a survival point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionGroup {
    High,
    Low,
}

impl ExpressionGroup {
    /// Classify an upstream group label.
    ///
    /// Labels vary between producers ("High", "High Expression"), so matching
    /// is by case-sensitive substring. "High" is checked first. Labels with
    /// neither substring yield `None`.
    pub fn classify(label: &str) -> Option<Self> {
        if label.contains("High") {
            Some(ExpressionGroup::High)
        } else if label.contains("Low") {
            Some(ExpressionGroup::Low)
        } else {
            None
        }
    }
}

/// One entry of the merged curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedSurvivalPoint {
    pub time: f64,
    pub high_probability: Option<f64>,
    pub low_probability: Option<f64>,
}

/// Merge the two expression groups into one time-ordered series.
///
/// Points whose label matches neither group, or whose time is not finite, are
/// dropped. When one group has several points at the same time the last one
/// in input order wins.
pub fn align_survival_curve(points: &[SurvivalPoint]) -> Vec<AlignedSurvivalPoint> {
    let mut high: Vec<(f64, f64)> = Vec::new();
    let mut low: Vec<(f64, f64)> = Vec::new();

    for point in points.iter().filter(|p| p.time.is_finite()) {
        match ExpressionGroup::classify(&point.group) {
            Some(ExpressionGroup::High) => high.push((point.time, point.survival_prob)),
            Some(ExpressionGroup::Low) => low.push((point.time, point.survival_prob)),
            None => {}
        }
    }

    // stable: equal times keep input order
    high.sort_by(|a, b| a.0.total_cmp(&b.0));
    low.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut times: Vec<f64> = high.iter().chain(low.iter()).map(|(t, _)| *t).collect();
    times.sort_by(|a, b| a.total_cmp(b));
    times.dedup();

    times
        .into_iter()
        .map(|time| AlignedSurvivalPoint {
            time,
            high_probability: probability_at(&high, time),
            low_probability: probability_at(&low, time),
        })
        .collect()
}

/// Exact-match lookup in a time-sorted series, last duplicate wins
fn probability_at(series: &[(f64, f64)], time: f64) -> Option<f64> {
    let end = series.partition_point(|(t, _)| *t <= time);
    match end.checked_sub(1).map(|i| series[i]) {
        Some((t, p)) if t == time => Some(p),
        _ => None,
    }
}
