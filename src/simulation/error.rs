//! Error types and handling
//!
//! This module contains the top-level error type for a generation run.
//! Configuration and validation failures are fatal and surface before any
//! record is produced; everything else carries the phase it failed in.

use thiserror::Error;

use crate::scenario::ScenarioValidationError;
use crate::types::ConfigError;

/// Errors that can occur during a generation run
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Scenario file could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scenario parameters are invalid
    #[error("Scenario validation failed: {0}")]
    Validation(#[from] ScenarioValidationError),

    /// Reference data generation failed
    #[error("Reference data generation failed: {0}")]
    ReferenceData(String),

    /// Order generation failed
    #[error("Order generation failed: {0}")]
    OrderGeneration(String),

    /// Support, abandonment, return or metric generation failed
    #[error("Entity generation failed: {0}")]
    EntityGeneration(String),

    /// Parallel worker failure
    #[error("Worker error: {0}")]
    Worker(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// Create a reference data error
    pub fn reference_data(msg: impl Into<String>) -> Self {
        Self::ReferenceData(msg.into())
    }

    /// Create an order generation error
    pub fn order_generation(msg: impl Into<String>) -> Self {
        Self::OrderGeneration(msg.into())
    }

    /// Create an entity generation error
    pub fn entity_generation(msg: impl Into<String>) -> Self {
        Self::EntityGeneration(msg.into())
    }

    /// Create a worker error
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Only output failures are worth retrying; generation itself is
    /// deterministic and fails the same way again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GenerationError::Io(_) => true,
            GenerationError::Csv(e) => e.is_io_error(),
            _ => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            GenerationError::Config(_) => "Configuration",
            GenerationError::Validation(_) => "Validation",
            GenerationError::ReferenceData(_) => "Reference Data",
            GenerationError::OrderGeneration(_) => "Order Generation",
            GenerationError::EntityGeneration(_) => "Entity Generation",
            GenerationError::Worker(_) => "Worker",
            GenerationError::Io(_) => "IO",
            GenerationError::Serialization(_) => "Serialization",
            GenerationError::Csv(_) => "CSV",
        }
    }

    /// Whether the run failed before producing any record
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerationError::Config(_) | GenerationError::Validation(_))
    }
}

/// Result type for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let error = GenerationError::order_generation("no products");
        assert!(matches!(error, GenerationError::OrderGeneration(_)));
        assert_eq!(error.to_string(), "Order generation failed: no products");
        assert_eq!(error.category(), "Order Generation");
    }

    #[test]
    fn test_error_from_validation() {
        let error: GenerationError = ScenarioValidationError::InvalidIntensity(-1.0).into();
        assert!(error.is_configuration());
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Validation");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error: GenerationError = io_error.into();
        assert!(error.is_recoverable());
        assert_eq!(error.category(), "IO");
    }

    #[test]
    fn test_error_from_config() {
        let error: GenerationError = ConfigError::MissingScenarioFile.into();
        assert!(error.is_configuration());
        assert!(error.to_string().contains("--config"));
    }
}
