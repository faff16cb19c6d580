//! Confidence scoring and Bayesian blending of formula vs. observed TDEE.

use serde::Serialize;

use crate::stats::coefficient_of_variation;

/// Paired-day count at which extra data stops improving confidence.
const DATA_SATURATION_DAYS: f64 = 28.0;

/// Baseline trust in the population formula for an unknown individual.
const BASELINE_CONFIDENCE: f64 = 0.4;

/// Intake coefficient of variation at which the noise penalty maxes out.
const CV_PENALTY_CAP: f64 = 0.5;

/// Half-saturation constant for the blend weight's data term: at n
/// paired days the term is n / (n + 14), asymptotic to 1.
const BLEND_HALF_SATURATION: f64 = 14.0;

/// Blend of the formula and observed estimates.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BlendResult {
    /// Weighted combination, rounded to whole kcal.
    pub blended_tdee: f64,
    /// Weight given to the observed estimate, in [0, 1).
    pub weight: f64,
}

/// Scores how much to trust the logged history, in [0, 1].
///
/// Starts at a 0.4 baseline (moderate trust in population formulas),
/// rises with paired-day count up to saturation around 28 days and with
/// regression fit, and falls with intake inconsistency: noisy logging is
/// never over-trusted regardless of volume. With every factor maximal
/// the score is exactly 1.
///
/// The weight sequence contributes only through how well a line explains
/// it, so callers pass the regression r2 rather than the sequence itself.
pub fn confidence_score(data_points: usize, intakes: &[f64], r2: f64) -> f64 {
    let data_factor = (data_points as f64 / DATA_SATURATION_DAYS).min(1.0);
    let cv = coefficient_of_variation(intakes);
    let noise_penalty = cv.min(CV_PENALTY_CAP) / CV_PENALTY_CAP;

    let score = BASELINE_CONFIDENCE + 0.35 * data_factor + 0.25 * r2.clamp(0.0, 1.0)
        - 0.3 * noise_penalty;

    score.clamp(0.0, 1.0)
}

/// Merges the formula and observed estimates into one number.
///
/// The observed estimate's weight grows with both paired-day count and
/// regression fit: near-zero influence at the 7-day minimum, leaning
/// observed with about a month of clean data, approaching but never
/// reaching full trust. Data points and r2 act as an evidence-strength
/// signal computed independently of the confidence scorer.
pub fn bayesian_blend(
    formula_tdee: f64,
    observed_tdee: f64,
    data_points: usize,
    r2: f64,
) -> BlendResult {
    let n = data_points as f64;
    let data_factor = n / (n + BLEND_HALF_SATURATION);
    let fit_factor = 0.5 + 0.5 * r2.clamp(0.0, 1.0);
    let weight = (data_factor * fit_factor).clamp(0.0, 1.0);

    let blended_tdee = (weight * observed_tdee + (1.0 - weight) * formula_tdee).round();

    BlendResult {
        blended_tdee,
        weight,
    }
}
