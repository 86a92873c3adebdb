//! Generation run orchestration and control
//!
//! This module contains the generation engine, the deterministic random
//! streams, run statistics, logging setup and error handling.
//!
//! # Overview
//!
//! - **GenerationEngine**: runs the pipeline for one resolved scenario
//! - **RngBank**: per-phase random streams derived from the scenario seed
//! - **RunReport**: per-table metadata and realised hourly correlations
//! - **LoggingConfig**: tracing subscriber setup for the binary and tests
//! - **GenerationError**: error type for every phase of a run
//!
//! # Usage Example
//!
//! ```rust
//! use ecom_synth::scenario::ScenarioBuilder;
//! use ecom_synth::simulation::GenerationEngine;
//! use ecom_synth::types::TableName;
//!
//! let config = ScenarioBuilder::preset("baseline")?
//!     .duration("6h")
//!     .customers(100)
//!     .product_count(50)
//!     .orders_per_hour(10.0)
//!     .seed(7)
//!     .build()?;
//!
//! let output = GenerationEngine::new(config).run(&[TableName::Orders, TableName::Customers])?;
//! assert_eq!(output.report.records(TableName::Customers), 100);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod error;
pub mod logging;
pub mod rng;
pub mod statistics;

// Re-export all public types for convenience
pub use engine::{GenerationEngine, GenerationOutput};
pub use error::{GenerationError, GenerationResult};
pub use logging::{LoggingConfig, DEFAULT_LOG_PREFIX};
pub use rng::{RngBank, StreamRng, StreamSlot};
pub use statistics::{pearson, CorrelationPair, CorrelationReport, RunReport, TableMetadata};
