//! Observed TDEE estimation from paired weight and intake history.
//!
//! Back-calculates empirical expenditure from the energy-balance identity:
//! smoothed weight change converts to an implied daily surplus or deficit
//! via the energy density of body mass, and observed TDEE is average
//! intake minus that surplus.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{EngineConfig, IntakeEntry, WeightEntry};
use crate::stats::{ewma, linear_regression, mean};

/// Minimum paired daily data points before an observed estimate exists.
pub const MIN_DATA_POINTS: usize = 7;

/// A day on which both weight and intake were logged.
#[derive(Debug, Clone, Copy)]
pub struct PairedDay {
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub calories: f64,
}

/// Empirical TDEE derived from logged history.
#[derive(Debug, Clone, Serialize)]
pub struct ObservedResult {
    /// Back-calculated expenditure in kcal/day.
    pub observed_tdee: f64,
    /// Arithmetic mean of raw logged intake over the window.
    pub avg_intake: f64,
    /// Number of paired days used.
    pub data_points: usize,
    /// EWMA-smoothed weight sequence over the paired days.
    pub smoothed_weights: Vec<f64>,
    /// Weight change per day (kg) from the regression on smoothed weights.
    pub regression_slope: f64,
    /// Goodness of fit of the weight trend line, in [0, 1].
    pub r2: f64,
}

/// Intersects the two logs by date, producing one `PairedDay` per
/// calendar day present in both, ascending by date.
pub fn pair_by_date(weights: &[WeightEntry], intakes: &[IntakeEntry]) -> Vec<PairedDay> {
    let intake_by_date: BTreeMap<NaiveDate, f64> =
        intakes.iter().map(|e| (e.date, e.calories)).collect();

    weights
        .iter()
        .filter_map(|w| {
            intake_by_date.get(&w.date).map(|&calories| PairedDay {
                date: w.date,
                weight_kg: w.weight_kg,
                calories,
            })
        })
        .collect()
}

/// Estimates observed TDEE from raw logs.
///
/// Returns `None` below [`MIN_DATA_POINTS`] paired days; insufficient
/// data is a degraded state, not an error.
pub fn estimate_observed_tdee(
    weights: &[WeightEntry],
    intakes: &[IntakeEntry],
    config: &EngineConfig,
) -> Option<ObservedResult> {
    let pairs = pair_by_date(weights, intakes);
    estimate_from_pairs(&pairs, config)
}

/// Estimates observed TDEE from an already-paired window.
///
/// The trend generator calls this directly with slices of a shared
/// paired-day arena, avoiding per-window re-pairing.
pub fn estimate_from_pairs(pairs: &[PairedDay], config: &EngineConfig) -> Option<ObservedResult> {
    if pairs.len() < MIN_DATA_POINTS {
        return None;
    }

    let raw_weights: Vec<f64> = pairs.iter().map(|p| p.weight_kg).collect();
    let intake: Vec<f64> = pairs.iter().map(|p| p.calories).collect();

    let smoothed_weights = ewma(&raw_weights, config.smoothing_alpha);
    let regression = linear_regression(&smoothed_weights);

    let avg_intake = mean(&intake);

    // Positive slope means gaining: the implied surplus came from intake,
    // so expenditure is that much lower. Negative slope raises it.
    let implied_surplus = regression.slope * config.kcal_per_kg;
    let observed_tdee = avg_intake - implied_surplus;

    Some(ObservedResult {
        observed_tdee,
        avg_intake,
        data_points: pairs.len(),
        smoothed_weights,
        regression_slope: regression.slope,
        r2: regression.r2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Builds paired weight/intake logs: weight starts at 80 kg and moves
    /// by `kg_per_day` daily; intake is constant.
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
    fn test_pairing_intersects_dates() {
        let weights = vec![
            WeightEntry::new(date(2024, 3, 1), 80.0),
            WeightEntry::new(date(2024, 3, 2), 80.1),
            WeightEntry::new(date(2024, 3, 4), 80.2),
        ];
        let intakes = vec![
            IntakeEntry::new(date(2024, 3, 2), 2100.0),
            IntakeEntry::new(date(2024, 3, 3), 2200.0),
            IntakeEntry::new(date(2024, 3, 4), 2000.0),
        ];

        let pairs = pair_by_date(&weights, &intakes);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].date, date(2024, 3, 2));
        assert_eq!(pairs[1].date, date(2024, 3, 4));
        assert_eq!(pairs[1].calories, 2000.0);
    }

    #[test]
    fn test_insufficient_data_returns_none() {
        let (weights, intakes) = logs(6, 0.0, 2000.0);
        let result = estimate_observed_tdee(&weights, &intakes, &EngineConfig::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_minimum_data_returns_some() {
        let (weights, intakes) = logs(7, 0.0, 2000.0);
        let result = estimate_observed_tdee(&weights, &intakes, &EngineConfig::default());
        assert!(result.is_some());
        assert_eq!(result.unwrap().data_points, 7);
    }

    #[test]
    fn test_flat_weight_tdee_equals_intake() {
        let (weights, intakes) = logs(14, 0.0, 2000.0);
        let result = estimate_observed_tdee(&weights, &intakes, &EngineConfig::default()).unwrap();
        assert!((result.observed_tdee - 2000.0).abs() < 1.0);
        assert!((result.avg_intake - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_losing_flat_gaining_strict_ordering() {
        let config = EngineConfig::default();
        let (w_lose, i_lose) = logs(14, -0.05, 2000.0);
        let (w_flat, i_flat) = logs(14, 0.0, 2000.0);
        let (w_gain, i_gain) = logs(14, 0.05, 2000.0);

        let losing = estimate_observed_tdee(&w_lose, &i_lose, &config).unwrap();
        let flat = estimate_observed_tdee(&w_flat, &i_flat, &config).unwrap();
        let gaining = estimate_observed_tdee(&w_gain, &i_gain, &config).unwrap();

        assert!(losing.observed_tdee > flat.observed_tdee);
        assert!(flat.observed_tdee > gaining.observed_tdee);
    }

    #[test]
    fn test_smoothing_attenuates_slope() {
        // The EWMA lags the raw trajectory, so the recovered slope is
        // attenuated but keeps its sign.
        let (weights, intakes) = logs(28, -0.05, 2000.0);
        let result =
            estimate_observed_tdee(&weights, &intakes, &EngineConfig::default()).unwrap();
        assert!(result.regression_slope < 0.0);
        assert!(result.regression_slope > -0.05);
        // Implied deficit raises observed TDEE above intake
        assert!(result.observed_tdee > 2000.0);
    }

    #[test]
    fn test_alpha_one_recovers_exact_slope() {
        let config = EngineConfig {
            smoothing_alpha: 1.0,
            ..EngineConfig::default()
        };
        let (weights, intakes) = logs(28, -0.05, 2000.0);
        let result = estimate_observed_tdee(&weights, &intakes, &config).unwrap();
        assert!((result.regression_slope - (-0.05)).abs() < 1e-9);
        // 0.05 kg/day deficit at 7700 kcal/kg = 385 kcal/day
        assert!((result.observed_tdee - 2385.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_loss_has_high_r2() {
        let (weights, intakes) = logs(28, -0.05, 2000.0);
        let result =
            estimate_observed_tdee(&weights, &intakes, &EngineConfig::default()).unwrap();
        assert!(result.r2 > 0.9);
    }
}
