//! Error types for the grade engine.

use thiserror::Error;

/// Errors raised when gradebook input or configuration is malformed.
///
/// Missing grades and unreachable targets are regular results, not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GradeError {
    /// Component weight is negative or not a number
    #[error("Invalid weight {weight} on component '{component}'")]
    InvalidWeight { component: String, weight: f64 },

    /// Component score outside 0-100
    #[error("Score {score} on component '{component}' is outside 0-100")]
    ScoreOutOfRange { component: String, score: f64 },

    /// Course credits must be positive
    #[error("Course '{course}' has non-positive credits ({credits})")]
    InvalidCredits { course: String, credits: f64 },

    #[error("Legacy credits must be non-negative, got {0}")]
    InvalidLegacyCredits(f64),

    #[error("Legacy GPA {0} is outside 0-100")]
    LegacyGpaOutOfRange(f64),

    #[error("Academic year must be positive, got {0}")]
    InvalidAcademicYear(u32),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Unknown term: {0}")]
    UnknownTerm(String),

    /// Planner configuration could not be loaded or is contradictory
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GradeError {
    /// Returns true if the error was caused by caller-supplied data.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, GradeError::Config { .. })
    }
}

impl From<std::io::Error> for GradeError {
    fn from(err: std::io::Error) -> Self {
        GradeError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GradeError {
    fn from(err: serde_json::Error) -> Self {
        GradeError::Config {
            message: err.to_string(),
        }
    }
}
