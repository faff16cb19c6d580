//! Error types for the adaptive TDEE engine.

use thiserror::Error;

/// Errors that can occur when parsing profile fields from stored text.
///
/// The engine itself never produces these during estimation; they exist
/// for the seam where an external profile store maps stored strings to
/// engine enums.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown gender: {0}")]
    UnknownGender(String),

    #[error("unknown activity level: {0}")]
    UnknownActivityLevel(String),

    #[error("unknown goal type: {0}")]
    UnknownGoalType(String),
}
