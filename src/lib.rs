//! Scenario-driven synthetic e-commerce data engine
//!
//! Generates internally consistent e-commerce tables (customers, suppliers,
//! products, campaigns, orders, order items, support tickets, abandoned carts,
//! returns and hourly system metrics) whose volumes and relationships are
//! shaped by a named business scenario.
//!
//! # Overview
//!
//! A run resolves a scenario (a preset, a custom JSON file, or either with
//! command-line overrides) into a validated [`ScenarioConfig`], then:
//!
//! - **Reference data**: customers drawn from cohort distributions, suppliers,
//!   a product catalogue and scenario campaigns
//! - **Intensity curve**: one multiplier per scenario hour combining the
//!   scenario shape, the diurnal pattern and seeded jitter
//! - **Orders**: an hourly plan with carried fractional remainders and an
//!   inventory ledger, executed in batches and optionally in parallel
//! - **Correlated entities**: tickets, carts, returns and metrics driven by
//!   the order stream and shared hourly signals
//!
//! ## Key Features
//!
//! - **Deterministic**: identical seed, configuration and worker count give
//!   identical output
//! - **Referentially sound**: every foreign key points at an earlier record
//! - **Exact money**: integer-cent arithmetic for totals, discounts and refunds
//! - **Closed scenario set**: each kind carries its own typed overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use ecom_synth::*;
//!
//! let config = ScenarioBuilder::preset("flash_sale")?
//!     .duration("4h")
//!     .customers(200)
//!     .product_count(100)
//!     .orders_per_hour(20.0)
//!     .seed(42)
//!     .build()?;
//!
//! let output = GenerationEngine::new(config).run(TableName::ALL)?;
//! println!("{}", output.report.compact_summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: identifiers, enums, money, durations and CLI arguments
//! - [`scenario`]: scenario kinds, presets, custom files and the resolved configuration
//! - [`cohort`]: validated distributions and per-cohort behavior tables
//! - [`curve`]: the hourly intensity curve
//! - [`reference`]: customers, suppliers, products and campaigns
//! - [`orders`]: the batched, parallel order engine
//! - [`entities`]: support tickets, abandonment, returns and system metrics
//! - [`simulation`]: the generation engine, random streams, reports, logging and errors
//! - [`output`]: table container, column dictionary and file writer
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Scenario   │───►│    Curve    │───►│   Orders    │
//! │  Config     │    │  Intensity  │    │ Plan/Engine │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        │                                     │
//!        ▼                                     ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Cohort    │───►│  Reference  │───►│  Entities   │
//! │   Model     │    │    Data     │    │ Tickets/... │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                                              │
//!                                              ▼
//!                                       ┌─────────────┐
//!                                       │   Output    │
//!                                       └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod cohort;
pub mod curve;
pub mod entities;
pub mod orders;
pub mod output;
pub mod reference;
pub mod scenario;
pub mod simulation;

pub mod types;

// Core types and identifiers
pub use types::{
    // Configuration
    CliArgs,
    Cohort,
    ConfigError,
    // Identifiers
    CustomerId,
    Money,
    OrderId,
    OutputFormat,
    ProductId,
    ScenarioDuration,
    // Enums
    TableName,
};

// Scenario resolution
pub use scenario::{ScenarioBuilder, ScenarioConfig, ScenarioKind, ScenarioValidationError};

// Generation
pub use cohort::{CohortBehaviorModel, Distribution};
pub use curve::IntensityCurve;
pub use entities::{CartAbandonment, Return, SupportTicket, SystemMetric};
pub use orders::{Order, OrderItem};
pub use reference::{Campaign, Customer, Product, ReferenceData, Supplier};

// Engine, reports and output
pub use output::{Table, TableWriter};
pub use simulation::{GenerationEngine, GenerationError, GenerationOutput, LoggingConfig, RunReport};
