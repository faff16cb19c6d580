//! Orchestration of the adaptive TDEE pipeline.
//!
//! The public entry point sequences the formula estimator, observed
//! estimator, confidence scorer, blender, detectors, and trend generator,
//! and assembles the user-facing result. Missing or insufficient data
//! degrades toward the formula estimate with lower confidence; no input
//! shape produces an error.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::confidence::{bayesian_blend, confidence_score};
use crate::detectors::{detect_metabolic_adaptation, detect_plateau};
use crate::domain::{
    EngineConfig, EstimateSource, GoalType, IntakeEntry, TrendDirection, UserBiometrics,
    WeightEntry,
};
use crate::formulas::{
    FormulaResult, MIN_RECOMMENDED_INTAKE, calculate_formula_tdee, clamp_tdee,
};
use crate::observed::{ObservedResult, PairedDay, estimate_from_pairs, pair_by_date};
use crate::trend::{TREND_WINDOW_DAYS, TrendPoint, generate_trend_from_pairs};

/// Confidence when there is truly nothing but demographic inference.
const ZERO_DATA_CONFIDENCE: f64 = 0.15;

/// Confidence when some days are logged but personalization has not yet
/// reached the 7-day minimum.
const LOW_DATA_CONFIDENCE: f64 = 0.3;

/// Weekly weight change (kg) below which the trajectory reads as stable.
const TREND_DEAD_ZONE_KG: f64 = 0.1;

/// Blend weight below which the estimate is labeled formula-driven.
const SOURCE_FORMULA_BELOW: f64 = 0.35;

/// Blend weight at or above which the estimate is labeled observed.
const SOURCE_OBSERVED_FROM: f64 = 0.6;

/// The authoritative per-call estimate.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveEstimate {
    /// Best estimate of daily expenditure, clamped to [800, 6000] kcal.
    pub tdee: f64,
    pub bmr: f64,
    pub activity_multiplier: f64,
    /// Trust in this estimate, in [0, 1].
    pub confidence: f64,
    pub estimate_source: EstimateSource,
    /// Number of paired weight/intake days behind the estimate.
    pub data_points: usize,
    pub trend: TrendDirection,
    /// Smoothed weight change per week in kg (negative when losing).
    pub weekly_weight_change_kg: f64,
    /// Blended TDEE adjusted for the weekly goal, floored at 1200 kcal.
    pub recommended_intake: f64,
}

/// Full result of one engine invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveReport {
    pub estimate: AdaptiveEstimate,
    pub trend_data: Vec<TrendPoint>,
    pub insights: Vec<String>,
    /// Distinct intake-logged days in the trailing 7-day window, in [0, 7].
    pub days_logged_this_week: usize,
}

/// Runs the full adaptive TDEE pipeline over the supplied history.
///
/// Pure function of its inputs: reads no clock, mutates nothing, and
/// never fails for well-shaped input. Sequences sorted ascending by date
/// with one entry per day are a log-store contract.
pub fn run_adaptive_analysis(
    weights: &[WeightEntry],
    intakes: &[IntakeEntry],
    biometrics: &UserBiometrics,
    config: &EngineConfig,
) -> AdaptiveReport {
    let formula = calculate_formula_tdee(biometrics);
    let pairs = pair_by_date(weights, intakes);
    let days_logged_this_week = days_logged_this_week(weights, intakes);

    if weights.is_empty() && intakes.is_empty() {
        log::debug!("no logged history; returning pure formula estimate");
        return AdaptiveReport {
            estimate: formula_only_estimate(&formula, biometrics, config, 0, ZERO_DATA_CONFIDENCE),
            trend_data: Vec::new(),
            insights: vec![
                "Still building your behavioral profile. Log weight and calories daily to \
                 unlock a personalized expenditure estimate."
                    .to_string(),
            ],
            days_logged_this_week,
        };
    }

    let observed = estimate_from_pairs(&pairs, config);
    let Some(observed) = observed else {
        log::debug!(
            "insufficient paired history ({} days); returning formula estimate",
            pairs.len()
        );
        return AdaptiveReport {
            estimate: formula_only_estimate(
                &formula,
                biometrics,
                config,
                pairs.len(),
                LOW_DATA_CONFIDENCE,
            ),
            trend_data: Vec::new(),
            insights: vec![format!(
                "Only {} paired days logged so far. At least 7 days of both weight and \
                 intake are needed to personalize your estimate.",
                pairs.len()
            )],
            days_logged_this_week,
        };
    };

    full_pipeline_report(
        &formula,
        &observed,
        &pairs_intake(&pairs),
        &pairs_weights(&pairs),
        &pairs,
        biometrics,
        config,
        days_logged_this_week,
    )
}

fn pairs_intake(pairs: &[PairedDay]) -> Vec<f64> {
    pairs.iter().map(|p| p.calories).collect()
}

fn pairs_weights(pairs: &[PairedDay]) -> Vec<f64> {
    pairs.iter().map(|p| p.weight_kg).collect()
}

#[allow(clippy::too_many_arguments)]
fn full_pipeline_report(
    formula: &FormulaResult,
    observed: &ObservedResult,
    intake_values: &[f64],
    weight_values: &[f64],
    pairs: &[PairedDay],
    biometrics: &UserBiometrics,
    config: &EngineConfig,
    days_logged_this_week: usize,
) -> AdaptiveReport {
    let confidence = confidence_score(observed.data_points, intake_values, observed.r2);
    let blend = bayesian_blend(
        formula.tdee,
        observed.observed_tdee,
        observed.data_points,
        observed.r2,
    );

    let estimate_source = classify_source(blend.weight);
    let weekly_weight_change_kg = observed.regression_slope * 7.0;
    let trend = classify_trend(weekly_weight_change_kg);

    log::debug!(
        "blend weight {:.2} -> source {:?} (formula {}, observed {:.0})",
        blend.weight,
        estimate_source,
        formula.tdee,
        observed.observed_tdee,
    );

    let adaptation =
        detect_metabolic_adaptation(formula.tdee, observed.observed_tdee, confidence);
    // The plateau detector only sees recent history: a slope left over
    // from an earlier loss phase must not mask a current stall.
    let recent_start = weight_values.len().saturating_sub(TREND_WINDOW_DAYS);
    let plateau = detect_plateau(
        &weight_values[recent_start..],
        biometrics.goal_type,
        observed.avg_intake,
        blend.blended_tdee,
        config,
    );

    let mut insights = Vec::new();
    if adaptation {
        log::info!(
            "metabolic adaptation flagged: observed {:.0} vs formula {}",
            observed.observed_tdee,
            formula.tdee
        );
        insights.push(
            "Your measured expenditure is running more than 10% below the formula \
             prediction. Metabolic adaptation is likely; consider a maintenance phase."
                .to_string(),
        );
    }
    if plateau {
        log::info!("plateau flagged despite deficit");
        insights.push(
            "Weight has stalled despite a caloric deficit. A diet break or a modest \
             calorie adjustment may restart progress."
                .to_string(),
        );
    }
    insights.push(trend_insight(trend, weekly_weight_change_kg));

    let recommended_intake = recommend_intake(blend.blended_tdee, biometrics, config);
    let trend_data = generate_trend_from_pairs(pairs, formula.tdee, config);

    AdaptiveReport {
        estimate: AdaptiveEstimate {
            tdee: clamp_tdee(blend.blended_tdee),
            bmr: formula.bmr,
            activity_multiplier: formula.multiplier,
            confidence,
            estimate_source,
            data_points: observed.data_points,
            trend,
            weekly_weight_change_kg,
            recommended_intake,
        },
        trend_data,
        insights,
        days_logged_this_week,
    }
}

/// Builds the degraded estimate used when the observed estimator cannot run.
fn formula_only_estimate(
    formula: &FormulaResult,
    biometrics: &UserBiometrics,
    config: &EngineConfig,
    data_points: usize,
    confidence: f64,
) -> AdaptiveEstimate {
    AdaptiveEstimate {
        tdee: clamp_tdee(formula.tdee),
        bmr: formula.bmr,
        activity_multiplier: formula.multiplier,
        confidence,
        estimate_source: EstimateSource::Formula,
        data_points,
        trend: TrendDirection::Stable,
        weekly_weight_change_kg: 0.0,
        recommended_intake: recommend_intake(formula.tdee, biometrics, config),
    }
}

fn classify_source(blend_weight: f64) -> EstimateSource {
    if blend_weight < SOURCE_FORMULA_BELOW {
        EstimateSource::Formula
    } else if blend_weight >= SOURCE_OBSERVED_FROM {
        EstimateSource::Observed
    } else {
        EstimateSource::Hybrid
    }
}

fn classify_trend(weekly_change_kg: f64) -> TrendDirection {
    if weekly_change_kg > TREND_DEAD_ZONE_KG {
        TrendDirection::Increasing
    } else if weekly_change_kg < -TREND_DEAD_ZONE_KG {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Adjusts the blended TDEE by the weekly goal via the energy-density
/// identity, with a hard 1200 kcal/day safety floor.
fn recommend_intake(tdee: f64, biometrics: &UserBiometrics, config: &EngineConfig) -> f64 {
    let direction = match biometrics.goal_type {
        GoalType::Cut => -1.0,
        GoalType::Maintain => 0.0,
        GoalType::Bulk => 1.0,
    };
    let daily_delta = direction * biometrics.weekly_goal_kg.abs() * config.kcal_per_kg / 7.0;
    (tdee + daily_delta).round().max(MIN_RECOMMENDED_INTAKE)
}

fn trend_insight(trend: TrendDirection, weekly_change_kg: f64) -> String {
    match trend {
        TrendDirection::Decreasing => format!(
            "Weight is trending down at {:.2} kg/week.",
            weekly_change_kg.abs()
        ),
        TrendDirection::Increasing => format!(
            "Weight is trending up at {:.2} kg/week.",
            weekly_change_kg.abs()
        ),
        TrendDirection::Stable => "Weight is holding steady week over week.".to_string(),
    }
}

/// Counts distinct intake dates in the trailing 7-day window ending at
/// the most recent entry in either log. The engine reads no wall clock;
/// callers wanting "this week" anchored at today can truncate history
/// accordingly.
fn days_logged_this_week(weights: &[WeightEntry], intakes: &[IntakeEntry]) -> usize {
    let latest = weights
        .iter()
        .map(|w| w.date)
        .chain(intakes.iter().map(|i| i.date))
        .max();
    let Some(latest) = latest else {
        return 0;
    };

    let window_start = latest - Duration::days(6);
    let intake_dates: BTreeSet<NaiveDate> = intakes
        .iter()
        .map(|i| i.date)
        .filter(|&d| d >= window_start && d <= latest)
        .collect();
    intake_dates.len().min(7)
}
