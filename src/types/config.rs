//! Command-line arguments and configuration-file errors
//!
//! This module contains the clap argument structure for the generator binary
//! and the error type raised while loading scenario files from disk. Scenario
//! resolution itself (presets, custom files, override precedence) lives in
//! [`crate::scenario`].

use super::{OutputFormat, TableName};
use clap::Parser;

/// Default output directory for generated tables
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ecom-synth",
    version,
    about = "Scenario-driven synthetic e-commerce data generator",
    long_about = "Generates internally-consistent e-commerce tables (customers, products, orders, support tickets, cart abandonment, returns, system metrics) shaped by a named business scenario such as a flash sale, a payment outage or a viral product moment.

EXAMPLES:
    # Run the baseline scenario with default settings
    ecom-synth baseline

    # Four-hour flash sale on electronics at 60% off
    ecom-synth flash_sale --discount 60 --category electronics

    # Only orders and returns, as JSON lines
    ecom-synth returns_wave --tables orders,order_items,returns --output jsonl

    # Use a custom scenario file
    ecom-synth custom --config my-scenario.json

    # Print the resolved scenario as a custom-file template
    ecom-synth payment_outage --print-config > outage.json

    # Validate a scenario without generating data
    ecom-synth custom --config outage.json --dry-run

SCENARIOS:
    flash_sale, returns_wave, supply_disruption, payment_outage, viral_moment,
    customer_segments, seasonal_planning, multi_channel, baseline, custom

CONFIGURATION:
    Scenario parameters are resolved in this order:
    1. Command line arguments (highest priority)
    2. Scenario file (--config flag)
    3. Preset defaults (lowest priority)

    Durations are a positive integer followed by h (hours), d (days) or
    m (30-day months)."
)]
pub struct CliArgs {
    /// Scenario preset name, or `custom` with --config
    #[arg(
        help = "Scenario preset name (or 'custom' with --config)",
        long_help = "Name of a built-in scenario preset. Use 'custom' together with --config to load a scenario file. Default: baseline"
    )]
    pub scenario: Option<String>,

    /// Custom scenario file path (JSON format)
    #[arg(
        short,
        long,
        help = "Scenario file path (JSON format)",
        long_help = "Path to a JSON scenario file. CLI arguments override file settings."
    )]
    pub config: Option<String>,

    /// Scenario duration expression
    #[arg(
        long,
        help = "Scenario duration (e.g. 4h, 14d, 1m)",
        long_help = "Scenario duration as a positive integer followed by h, d or m. Note that m means 30-day months, not minutes."
    )]
    pub duration: Option<String>,

    /// Overall intensity multiplier
    #[arg(long, help = "Overall intensity multiplier (must be > 0)")]
    pub intensity: Option<f64>,

    /// Discount percentage for discount-driven scenarios
    #[arg(long, help = "Discount percentage (0-100) for flash sale and seasonal scenarios")]
    pub discount: Option<f64>,

    /// Focus product category
    #[arg(long, help = "Focus product category (electronics, clothing, home, beauty, books)")]
    pub category: Option<String>,

    /// Number of customers to generate
    #[arg(long, help = "Number of customers to generate")]
    pub customers: Option<usize>,

    /// Baseline order rate per day
    #[arg(
        long,
        help = "Baseline orders per day",
        long_help = "Baseline order rate per day. Takes precedence over --orders-per-hour (rate = per_day / 24)."
    )]
    pub orders_per_day: Option<f64>,

    /// Baseline order rate per hour
    #[arg(long, help = "Baseline orders per hour")]
    pub orders_per_hour: Option<f64>,

    /// Number of products in the catalogue
    #[arg(long, help = "Number of products in the catalogue")]
    pub products: Option<usize>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Scenario start time
    #[arg(long, help = "Scenario start time (RFC 3339, e.g. 2024-11-29T00:00:00Z)")]
    pub start: Option<String>,

    /// Comma-separated list of tables to generate
    #[arg(
        long,
        default_value = "all",
        help = "Tables to generate (comma-separated, or 'all')",
        long_help = "Comma-separated list of tables: customers, suppliers, products, campaigns, orders, order_items, support_tickets, cart_abandonment, returns, system_metrics. Default: all"
    )]
    pub tables: String,

    /// Output format
    #[arg(long, default_value = "csv", help = "Output format (csv or jsonl)")]
    pub output: String,

    /// Output directory
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, help = "Directory for generated files")]
    pub output_dir: String,

    /// Number of parallel order workers
    #[arg(
        long,
        help = "Parallel order workers",
        long_help = "Number of workers for parallel order generation. Output is deterministic for a fixed worker count. Default: sequential"
    )]
    pub workers: Option<usize>,

    /// Write the column dictionary alongside the tables
    #[arg(long, help = "Write a JSON column dictionary for the generated tables")]
    pub dictionary: bool,

    /// List built-in scenarios and exit
    #[arg(long, help = "List built-in scenario presets and exit")]
    pub list: bool,

    /// Dry run mode - validate the scenario without generating data
    #[arg(long, help = "Validate the scenario without generating data")]
    pub dry_run: bool,

    /// Print the resolved scenario and exit
    #[arg(long, help = "Print the resolved scenario as JSON and exit")]
    pub print_config: bool,

    /// Directory for daily-rolling JSON log files
    #[arg(long, value_name = "DIR", help = "Also write JSON logs to daily-rolling files in DIR")]
    pub log_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,
}

impl CliArgs {
    /// Tables selected with `--tables`
    pub fn table_selection(&self) -> Result<Vec<TableName>, String> {
        TableName::parse_selection(&self.tables)
    }

    /// Output format selected with `--output`
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.output.parse()
    }
}

/// Scenario file loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Scenario file not found
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),

    /// Scenario file read error
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON scenario file: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported scenario file format
    #[error("Unsupported scenario file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// `custom` was requested without a scenario file
    #[error("The 'custom' scenario requires --config <file.json>")]
    MissingScenarioFile,
}
