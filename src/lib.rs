//! Adaptive TDEE estimation engine.
//!
//! Reconciles a population-formula prediction (Mifflin-St Jeor with an
//! activity multiplier) against what the user's own logged body-weight
//! and calorie-intake history implies via the energy-balance identity,
//! blends the two by evidence strength, and flags metabolic adaptation
//! and weight plateaus.
//!
//! The engine is pure computation over caller-supplied history: it is
//! invoked on demand over a finite window, recomputes from scratch each
//! call, keeps no state between invocations, and never mutates its
//! inputs, so concurrent invocations need no synchronization. Storage,
//! presentation, and authentication are external collaborators.
//!
//! Entry point: [`run_adaptive_analysis`].

pub mod analysis;
pub mod confidence;
pub mod detectors;
pub mod domain;
pub mod error;
pub mod formulas;
pub mod observed;
pub mod stats;
pub mod trend;

pub use analysis::{AdaptiveEstimate, AdaptiveReport, run_adaptive_analysis};
pub use confidence::{BlendResult, bayesian_blend, confidence_score};
pub use detectors::{detect_metabolic_adaptation, detect_plateau};
pub use domain::{
    ActivityLevel, EngineConfig, EstimateSource, Gender, GoalType, IntakeEntry, TrendDirection,
    UserBiometrics, WeightEntry,
};
pub use error::ParseError;
pub use formulas::{FormulaResult, calculate_bmr, calculate_formula_tdee};
pub use observed::{ObservedResult, estimate_observed_tdee};
pub use trend::{TrendPoint, generate_trend};
