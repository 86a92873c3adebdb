//! Core types for the e-commerce generator
//!
//! This module contains the fundamental value types shared by every generator
//! and by the command-line front end.
//!
//! # Overview
//!
//! - **Identifiers**: prefixed, UUID-backed identifiers for every record type
//! - **Enums**: closed vocabularies (cohorts, categories, channels, statuses, tables)
//! - **Duration**: compact duration expressions such as `4h`, `14d`, `1m`
//! - **Money**: integer-cent amounts with exact arithmetic
//! - **Configuration**: command-line arguments and configuration-file errors
//!
//! # Usage Example
//!
//! ```rust
//! use ecom_synth::types::*;
//!
//! let duration: ScenarioDuration = "14d".parse().unwrap();
//! assert_eq!(duration.total_hours(), 336);
//!
//! let price = Money::from_amount(19.99);
//! assert_eq!((price * 2).to_string(), "39.98");
//!
//! let tables = TableName::parse_selection("orders,returns").unwrap();
//! assert!(tables.contains(&TableName::Returns));
//! ```

pub mod config;
pub mod duration;
pub mod enums;
pub mod identifiers;
pub mod money;

// Re-export all public types for convenience
pub use config::*;
pub use duration::*;
pub use enums::*;
pub use identifiers::*;
pub use money::*;
