//! Custom error types for Paycycle
//!
//! One error enum covers both the schedule engine (recurrence parsing) and the
//! surrounding storage/CLI layers, defined with thiserror.

use thiserror::Error;

/// The main error type for Paycycle operations
#[derive(Error, Debug)]
pub enum PaycycleError {
    /// Schedule or recurrence kind that the engine does not know
    #[error("Unknown schedule kind: {0}")]
    UnknownScheduleKind(String),

    /// Schedule detail payload that does not match its declared kind
    #[error("Malformed {kind} schedule detail: {reason}")]
    MalformedScheduleDetail { kind: String, reason: String },

    /// Anchor or one-time date that is not a valid calendar date
    #[error("Invalid anchor date: {0}")]
    InvalidAnchorDate(String),

    /// Semimonthly detail without exactly two days
    #[error("Semimonthly schedules need exactly 2 days, got {0}")]
    InvalidDayCount(usize),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl PaycycleError {
    /// Shorthand for a detail payload that failed to parse
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedScheduleDetail {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    pub fn income_source_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Income source",
            identifier: identifier.into(),
        }
    }

    pub fn bill_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Bill",
            identifier: identifier.into(),
        }
    }

    pub fn period_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Pay period",
            identifier: identifier.into(),
        }
    }

    pub fn assignment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Assignment",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from parsing a schedule or recurrence
    pub fn is_schedule_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownScheduleKind(_)
                | Self::MalformedScheduleDetail { .. }
                | Self::InvalidAnchorDate(_)
                | Self::InvalidDayCount(_)
        )
    }
}

impl From<std::io::Error> for PaycycleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PaycycleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Paycycle operations
pub type PaycycleResult<T> = Result<T, PaycycleError>;
