//! Day-by-day reconstruction of TDEE and confidence over a rolling window.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;

use crate::confidence::confidence_score;
use crate::domain::{EngineConfig, IntakeEntry, WeightEntry};
use crate::formulas::clamp_tdee;
use crate::observed::{MIN_DATA_POINTS, PairedDay, estimate_from_pairs, pair_by_date};

/// Longest trailing window considered for any single trend point, in
/// calendar days. Also the window the orchestrator hands the plateau
/// detector as "recent" history.
pub const TREND_WINDOW_DAYS: usize = 28;

/// One chartable day of reconstructed estimate history.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// TDEE estimate for the trailing window ending on this date,
    /// clamped to the plausible range.
    pub tdee: f64,
    /// Smoothed weight at the end of that window.
    pub smoothed_weight: f64,
    /// Confidence in this day's estimate, in [0, 1].
    pub confidence: f64,
}

/// Reconstructs the estimate day by day for charting.
///
/// Produces one point per paired day once a rolling 7-day minimum window
/// is available (empty below that). Each point re-runs the observed
/// estimator and confidence scorer over the trailing 28 calendar days
/// ending at that date; with gaps in logging such a window can hold too
/// few paired days for an observed estimate, and the point falls back to
/// the supplied baseline. Windows are slices of one shared paired-day
/// sequence, and days are computed in parallel since each is
/// independent.
pub fn generate_trend(
    weights: &[WeightEntry],
    intakes: &[IntakeEntry],
    baseline_tdee: f64,
    config: &EngineConfig,
) -> Vec<TrendPoint> {
    let pairs = pair_by_date(weights, intakes);
    generate_trend_from_pairs(&pairs, baseline_tdee, config)
}

/// Trend generation over an already-paired sequence.
pub fn generate_trend_from_pairs(
    pairs: &[PairedDay],
    baseline_tdee: f64,
    config: &EngineConfig,
) -> Vec<TrendPoint> {
    if pairs.len() < MIN_DATA_POINTS {
        return Vec::new();
    }

    (MIN_DATA_POINTS - 1..pairs.len())
        .into_par_iter()
        .map(|end| {
            let window_start_date =
                pairs[end].date - Duration::days(TREND_WINDOW_DAYS as i64 - 1);
            let start = pairs[..=end].partition_point(|p| p.date < window_start_date);
            trend_point_for(&pairs[start..=end], baseline_tdee, config)
        })
        .collect()
}

/// Computes one trend point from a trailing window of paired days.
fn trend_point_for(window: &[PairedDay], baseline_tdee: f64, config: &EngineConfig) -> TrendPoint {
    let date = window.last().map(|p| p.date).unwrap_or_default();
    let intake: Vec<f64> = window.iter().map(|p| p.calories).collect();

    match estimate_from_pairs(window, config) {
        Some(observed) => TrendPoint {
            date,
            tdee: clamp_tdee(observed.observed_tdee),
            smoothed_weight: observed
                .smoothed_weights
                .last()
                .copied()
                .unwrap_or_default(),
            confidence: confidence_score(observed.data_points, &intake, observed.r2),
        },
        // Too few paired days in the calendar window (gaps in logging);
        // keep the chart continuous with the caller's baseline.
        None => TrendPoint {
            date,
            tdee: clamp_tdee(baseline_tdee),
            smoothed_weight: window.last().map(|p| p.weight_kg).unwrap_or_default(),
            confidence: confidence_score(window.len(), &intake, 0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn logs(days: i64, kg_per_day: f64, calories: f64) -> (Vec<WeightEntry>, Vec<IntakeEntry>) {
        let start = date(2024, 3, 1);
        let weights = (0..days)
            .map(|i| WeightEntry::new(start + Duration::days(i), 80.0 + kg_per_day * i as f64))
            .collect();
        let intakes = (0..days)
            .map(|i| IntakeEntry::new(start + Duration::days(i), calories))
            .collect();
        (weights, intakes)
    }

    #[test]
    fn test_empty_below_minimum_window() {
        let (weights, intakes) = logs(6, 0.0, 2000.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        assert!(trend.is_empty());
    }

    #[test]
    fn test_one_point_per_day_from_seventh() {
        let (weights, intakes) = logs(20, 0.0, 2000.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        // Days 7..=20 produce points
        assert_eq!(trend.len(), 14);
        assert_eq!(trend[0].date, date(2024, 3, 7));
        assert_eq!(trend.last().unwrap().date, date(2024, 3, 20));
    }

    #[test]
    fn test_points_are_date_ordered() {
        let (weights, intakes) = logs(30, -0.03, 2100.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        for pair in trend.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_flat_history_tracks_intake() {
        let (weights, intakes) = logs(20, 0.0, 2000.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        for point in &trend {
            assert!((point.tdee - 2000.0).abs() < 10.0);
            assert!((point.smoothed_weight - 80.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tdee_clamped() {
        // Absurd intake drives the raw estimate below the floor
        let (weights, intakes) = logs(20, 0.0, 100.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        for point in &trend {
            assert!(point.tdee >= 800.0);
            assert!(point.tdee <= 6000.0);
        }
    }

    #[test]
    fn test_confidence_in_unit_range_and_grows_with_window() {
        let (weights, intakes) = logs(40, -0.02, 2200.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        for point in &trend {
            assert!(point.confidence >= 0.0);
            assert!(point.confidence <= 1.0);
        }
        // Early points see 7-day windows, late points see 28-day windows
        assert!(trend.last().unwrap().confidence >= trend[0].confidence);
    }

    #[test]
    fn test_sparse_window_falls_back_to_baseline() {
        // 10 consecutive paired days, a 40-day gap, then 5 more days.
        // Post-gap calendar windows hold too few paired days for an
        // observed estimate, so those points carry the baseline.
        let start = date(2024, 3, 1);
        let mut weights = Vec::new();
        let mut intakes = Vec::new();
        for i in (0..10).chain(50..55) {
            weights.push(WeightEntry::new(start + Duration::days(i), 80.0));
            intakes.push(IntakeEntry::new(start + Duration::days(i), 2000.0));
        }

        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        // 15 paired days produce points from the 7th onward
        assert_eq!(trend.len(), 9);

        // Pre-gap points are observed estimates tracking intake
        assert!((trend[0].tdee - 2000.0).abs() < 10.0);
        // Post-gap points fall back to the baseline
        let last = trend.last().unwrap();
        assert_eq!(last.date, start + Duration::days(54));
        assert_eq!(last.tdee, 2500.0);
        assert!((last.smoothed_weight - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_capped_at_28_days() {
        // With 60 days of steady loss the late windows all span 28 days,
        // so late points should stabilize near the same estimate.
        let (weights, intakes) = logs(60, -0.03, 2000.0);
        let trend = generate_trend(&weights, &intakes, 2500.0, &EngineConfig::default());
        let last = trend.last().unwrap();
        let prev = &trend[trend.len() - 2];
        assert!((last.tdee - prev.tdee).abs() < 20.0);
    }
}
