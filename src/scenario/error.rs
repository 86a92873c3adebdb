//! Scenario validation errors

use crate::cohort::DistributionError;
use crate::types::DurationParseError;
use thiserror::Error;

/// Validation errors for a scenario definition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioValidationError {
    /// Duration expression did not parse
    #[error("Invalid duration: {0}")]
    InvalidDuration(#[from] DurationParseError),

    /// Scenario preset or kind tag is unknown
    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),

    /// Kind-specific override block did not match its schema
    #[error("Invalid overrides for scenario kind '{kind}': {message}")]
    InvalidOverrides {
        /// Scenario kind tag
        kind: String,
        /// Parser message
        message: String,
    },

    /// Intensity multiplier was not a positive finite number
    #[error("Intensity multiplier must be a positive finite number, got {0}")]
    InvalidIntensity(f64),

    /// A numeric override was outside its allowed range
    #[error("Override '{field}' = {value} is out of range ({expected})")]
    OutOfRange {
        /// Override name
        field: String,
        /// Rejected value
        value: f64,
        /// Allowed range
        expected: &'static str,
    },

    /// A count override was zero
    #[error("'{0}' must be greater than 0")]
    ZeroCount(String),

    /// Product category name is unknown
    #[error("{0}")]
    InvalidCategory(String),

    /// An hour-based window starts at or after the end of the run
    #[error("Override '{field}' = {hour} must fall inside the run (hours 0-{last})")]
    WindowOutsideRun {
        /// Override name
        field: String,
        /// Rejected start hour
        hour: usize,
        /// Last hour of the run
        last: usize,
    },

    /// The scenario window ends beyond the representable calendar
    #[error("Scenario starting {start} with duration {duration} ends beyond the supported date range")]
    WindowOverflow {
        /// Requested start (RFC 3339)
        start: String,
        /// Requested duration
        duration: String,
    },

    /// Start time is not RFC 3339
    #[error("Invalid start time '{0}' (expected RFC 3339, e.g. 2024-11-29T00:00:00Z)")]
    InvalidStart(String),

    /// Supplier name did not match any known supplier
    #[error("Unknown supplier '{0}'")]
    UnknownSupplier(String),

    /// Correlation target outside [-1, 1]
    #[error("Correlation target '{pair}' = {value} must be within [-1, 1]")]
    InvalidCorrelation {
        /// Target pair
        pair: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Correlation targets do not form a positive-definite matrix
    #[error("Correlation targets are not jointly achievable (matrix is not positive-definite)")]
    CorrelationNotPositiveDefinite,

    /// Table or output format selection did not parse
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Cohort tables became invalid after applying the scenario adjustment
    #[error("Invalid cohort distribution: {0}")]
    Distribution(#[from] DistributionError),
}

impl ScenarioValidationError {
    /// Create an out-of-range error
    pub fn out_of_range(field: impl Into<String>, value: f64, expected: &'static str) -> Self {
        Self::OutOfRange { field: field.into(), value, expected }
    }

    /// Create an override schema error
    pub fn invalid_overrides(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOverrides { kind: kind.into(), message: message.into() }
    }
}

/// Result type for scenario validation
pub type ValidationResult<T> = Result<T, ScenarioValidationError>;

/// Check that a window starting at `hour` begins before the end of the run
pub(crate) fn check_window_start(field: &str, hour: usize, total_hours: usize) -> ValidationResult<()> {
    if hour >= total_hours {
        return Err(ScenarioValidationError::WindowOutsideRun {
            field: field.to_string(),
            hour,
            last: total_hours.saturating_sub(1),
        });
    }
    Ok(())
}

/// Check that `value` lies within `[min, max]`
pub(crate) fn check_range(
    field: &str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> ValidationResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ScenarioValidationError::out_of_range(field, value, expected));
    }
    Ok(())
}
