//! Population-formula TDEE estimation and unit conversion helpers.

use serde::Serialize;

use crate::domain::{ActivityLevel, Gender, UserBiometrics};

/// Lower clamp for any TDEE-like output (kcal/day).
pub const TDEE_MIN: f64 = 800.0;

/// Upper clamp for any TDEE-like output (kcal/day).
pub const TDEE_MAX: f64 = 6000.0;

/// Hard safety floor for recommended intake (kcal/day), regardless of
/// goal aggressiveness.
pub const MIN_RECOMMENDED_INTAKE: f64 = 1200.0;

/// Pounds per kilogram conversion factor.
pub const LB_TO_KG: f64 = 0.453592;

/// Centimeters per inch conversion factor.
pub const INCH_TO_CM: f64 = 2.54;

/// Population-based TDEE estimate, independent of logged history.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormulaResult {
    /// Basal metabolic rate in kcal/day (Mifflin-St Jeor).
    pub bmr: f64,
    /// BMR scaled by the activity multiplier, rounded to whole kcal.
    pub tdee: f64,
    /// The activity multiplier that was applied.
    pub multiplier: f64,
}

/// Calculates BMR via the Mifflin-St Jeor equation.
///
/// Male: `10·kg + 6.25·cm − 5·age + 5`; female and other use the −161
/// constant. Biometric validity (positive weight/height/age) is a caller
/// contract.
pub fn calculate_bmr(biometrics: &UserBiometrics) -> f64 {
    let base = 10.0 * biometrics.weight_kg + 6.25 * biometrics.height_cm
        - 5.0 * biometrics.age as f64;
    match biometrics.gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    }
}

/// Returns the TDEE multiplier for an activity level.
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::Extreme => 1.9,
    }
}

/// Calculates the population-formula TDEE baseline for a user.
///
/// Always returns a value; there are no error conditions.
pub fn calculate_formula_tdee(biometrics: &UserBiometrics) -> FormulaResult {
    let bmr = calculate_bmr(biometrics);
    let multiplier = activity_multiplier(biometrics.activity_level);
    FormulaResult {
        bmr,
        tdee: (bmr * multiplier).round(),
        multiplier,
    }
}

/// Clamps a TDEE-like value to the physiologically plausible range.
pub fn clamp_tdee(tdee: f64) -> f64 {
    tdee.clamp(TDEE_MIN, TDEE_MAX)
}

/// Converts pounds to kilograms.
pub fn lb_to_kg(pounds: f64) -> f64 {
    pounds * LB_TO_KG
}

/// Converts kilograms to pounds.
pub fn kg_to_lb(kilograms: f64) -> f64 {
    kilograms / LB_TO_KG
}

/// Converts inches to centimeters.
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * INCH_TO_CM
}

/// Converts centimeters to inches.
pub fn cm_to_inches(centimeters: f64) -> f64 {
    centimeters / INCH_TO_CM
}
