//! Domain types for logged history and user biometrics.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ParseError;

/// A single logged body-weight measurement.
///
/// One entry per calendar day; sequences handed to the engine are sorted
/// ascending by date (a log-store contract, not enforced here).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

impl WeightEntry {
    pub fn new(date: NaiveDate, weight_kg: f64) -> Self {
        Self { date, weight_kg }
    }
}

/// A single logged day of calorie intake.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IntakeEntry {
    pub date: NaiveDate,
    pub calories: f64,
}

impl IntakeEntry {
    pub fn new(date: NaiveDate, calories: f64) -> Self {
        Self { date, calories }
    }
}

/// Gender for the Mifflin-St Jeor BMR formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ParseError::UnknownGender(s.to_string())),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Daily activity level, mapped to a TDEE multiplier in `formulas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extreme,
}

impl ActivityLevel {
    /// Parses a stored activity string, falling back to `Moderate` for
    /// anything unrecognized so the multiplier lookup defaults to 1.55.
    pub fn from_str_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or(ActivityLevel::Moderate)
    }
}

impl FromStr for ActivityLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately active" => Ok(ActivityLevel::Moderate),
            "active" | "very active" => Ok(ActivityLevel::Active),
            "extreme" | "extremely active" => Ok(ActivityLevel::Extreme),
            _ => Err(ParseError::UnknownActivityLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Extreme => "extreme",
        };
        write!(f, "{}", name)
    }
}

/// The user's current dieting goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Cut,
    Maintain,
    Bulk,
}

impl FromStr for GoalType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cut" | "lose" | "deficit" => Ok(GoalType::Cut),
            "maintain" | "maintenance" => Ok(GoalType::Maintain),
            "bulk" | "gain" | "surplus" => Ok(GoalType::Bulk),
            _ => Err(ParseError::UnknownGoalType(s.to_string())),
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GoalType::Cut => "cut",
            GoalType::Maintain => "maintain",
            GoalType::Bulk => "bulk",
        };
        write!(f, "{}", name)
    }
}

/// User biometrics and goal, supplied per invocation by the profile store.
#[derive(Debug, Clone, Serialize)]
pub struct UserBiometrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    /// Desired weekly weight change in kg (magnitude; direction comes
    /// from `goal_type`).
    pub weekly_goal_kg: f64,
}

/// Which estimate the final TDEE number is dominated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    Formula,
    Hybrid,
    Observed,
}

/// Direction of the smoothed weight trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Tunable engine constants.
///
/// The smoothing factor and energy density are clinical heuristics, not
/// optimized values, so they are exposed here rather than hard-coded.
/// The defaults reproduce the documented engine behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// EWMA smoothing factor for daily weights. Day-to-day scale noise
    /// (water, sodium, GI contents) is large relative to true fat-mass
    /// change, so a low factor is needed to reject it.
    pub smoothing_alpha: f64,

    /// Energy density of body mass in kcal per kg.
    pub kcal_per_kg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.15,
            kcal_per_kg: 7700.0,
        }
    }
}
