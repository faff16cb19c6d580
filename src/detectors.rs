//! Detectors for the two failure modes of naive dieting: metabolic
//! adaptation and weight plateaus.

use crate::domain::{EngineConfig, GoalType};
use crate::stats::{ewma, linear_regression};

/// Minimum confidence before the adaptation warning can fire.
const ADAPTATION_MIN_CONFIDENCE: f64 = 0.3;

/// Observed expenditure must be more than this fraction below formula.
const ADAPTATION_SUPPRESSION_RATIO: f64 = 0.10;

/// Minimum days of recent weight history before a plateau can be called.
const PLATEAU_MIN_DAYS: usize = 14;

/// Weekly weight change below this magnitude (kg) counts as stalled.
const PLATEAU_WEEKLY_THRESHOLD_KG: f64 = 0.15;

/// Flags sustained expenditure suppression relative to the formula.
///
/// Fires only when the evidence is trustworthy (confidence at least 0.3)
/// and observed expenditure is strictly more than 10% below the formula
/// prediction; exactly 10% does not fire, and observed at or above
/// formula never fires.
pub fn detect_metabolic_adaptation(formula_tdee: f64, observed_tdee: f64, confidence: f64) -> bool {
    if confidence < ADAPTATION_MIN_CONFIDENCE {
        return false;
    }
    observed_tdee < formula_tdee * (1.0 - ADAPTATION_SUPPRESSION_RATIO)
}

/// Flags a stalled cut: no weight movement despite a nominal deficit.
///
/// All conditions must hold: the goal is a cut, intake is strictly below
/// expenditure, at least 14 days of recent weights exist, and the weekly
/// rate implied by the smoothed weight trend is near zero. Shorter
/// histories return false for insufficient data.
pub fn detect_plateau(
    recent_weights: &[f64],
    goal_type: GoalType,
    avg_intake: f64,
    tdee: f64,
    config: &EngineConfig,
) -> bool {
    if goal_type != GoalType::Cut {
        return false;
    }
    if avg_intake >= tdee {
        // Not even in a deficit: goal misconfiguration, not a plateau.
        return false;
    }
    if recent_weights.len() < PLATEAU_MIN_DAYS {
        return false;
    }

    let smoothed = ewma(recent_weights, config.smoothing_alpha);
    let weekly_change = linear_regression(&smoothed).slope * 7.0;
    weekly_change.abs() < PLATEAU_WEEKLY_THRESHOLD_KG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptation_fires_beyond_ten_percent() {
        // 2249 < 2500 * 0.9 = 2250
        assert!(detect_metabolic_adaptation(2500.0, 2249.0, 0.5));
    }

    #[test]
    fn test_adaptation_boundary_is_exclusive() {
        // Exactly 10% below does not fire
        assert!(!detect_metabolic_adaptation(2500.0, 2250.0, 0.5));
    }

    #[test]
    fn test_adaptation_requires_confidence() {
        assert!(!detect_metabolic_adaptation(2500.0, 2000.0, 0.29));
        assert!(detect_metabolic_adaptation(2500.0, 2000.0, 0.3));
    }

    #[test]
    fn test_adaptation_never_fires_above_formula() {
        assert!(!detect_metabolic_adaptation(2500.0, 2500.0, 0.9));
        assert!(!detect_metabolic_adaptation(2500.0, 2700.0, 0.9));
    }

    #[test]
    fn test_plateau_on_flat_cut() {
        let weights = vec![80.0; 20];
        assert!(detect_plateau(
            &weights,
            GoalType::Cut,
            1800.0,
            2400.0,
            &EngineConfig::default()
        ));
    }

    #[test]
    fn test_plateau_requires_cut_goal() {
        let weights = vec![80.0; 20];
        let config = EngineConfig::default();
        assert!(!detect_plateau(&weights, GoalType::Maintain, 1800.0, 2400.0, &config));
        assert!(!detect_plateau(&weights, GoalType::Bulk, 1800.0, 2400.0, &config));
    }

    #[test]
    fn test_plateau_requires_deficit() {
        let weights = vec![80.0; 20];
        let config = EngineConfig::default();
        // Intake at or above expenditure is goal misconfiguration
        assert!(!detect_plateau(&weights, GoalType::Cut, 2400.0, 2400.0, &config));
        assert!(!detect_plateau(&weights, GoalType::Cut, 2600.0, 2400.0, &config));
    }

    #[test]
    fn test_plateau_requires_minimum_window() {
        let weights = vec![80.0; 10];
        assert!(!detect_plateau(
            &weights,
            GoalType::Cut,
            1800.0,
            2400.0,
            &EngineConfig::default()
        ));
    }

    #[test]
    fn test_no_plateau_while_actually_losing() {
        // Losing 0.1 kg/day is well above the stall threshold
        let weights: Vec<f64> = (0..20).map(|i| 80.0 - 0.1 * i as f64).collect();
        assert!(!detect_plateau(
            &weights,
            GoalType::Cut,
            1800.0,
            2400.0,
            &EngineConfig::default()
        ));
    }
}
