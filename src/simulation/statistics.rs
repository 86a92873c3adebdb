//! Statistics collection and reporting
//!
//! This module contains per-table generation metadata and the run report,
//! including the realised hourly correlations between the driven series.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::scenario::correlation::SERIES_COUNT;
use crate::scenario::CorrelationTargets;
use crate::types::TableName;

/// Generation metadata for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    /// Table name
    pub table: TableName,
    /// Number of records produced
    pub records: usize,
    /// Wall-clock time spent producing the table
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}

/// Pearson correlation coefficient of two equally long series.
///
/// Returns `None` for fewer than two points or when either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

/// Target and realised value of one correlation pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    /// Pair name, e.g. `orders_support`
    pub pair: &'static str,
    /// Configured target
    pub target: f64,
    /// Realised hourly correlation, when measurable
    pub realised: Option<f64>,
}

/// Realised correlations of the hourly series
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationReport {
    /// One entry per target pair
    pub pairs: Vec<CorrelationPair>,
}

impl CorrelationReport {
    /// Measure every target pair over hourly series indexed like the targets
    pub fn measure(targets: &CorrelationTargets, series: &[Vec<f64>; SERIES_COUNT]) -> Self {
        let pairs = targets
            .pairs()
            .into_iter()
            .map(|(pair, a, b, target)| CorrelationPair { pair, target, realised: pearson(&series[a], &series[b]) })
            .collect();
        Self { pairs }
    }

    /// Realised value of a pair
    pub fn realised(&self, pair: &str) -> Option<f64> {
        self.pairs.iter().find(|p| p.pair == pair).and_then(|p| p.realised)
    }
}

/// Summary of one generation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Scenario name
    pub scenario: String,
    /// Scenario kind tag
    pub kind: &'static str,
    /// Master seed
    pub seed: u64,
    /// First instant of the scenario window
    pub start: DateTime<Utc>,
    /// End of the scenario window (exclusive)
    pub end: DateTime<Utc>,
    /// Scenario hours
    pub hours: usize,
    /// Order workers used
    pub workers: usize,
    /// Per-table metadata in generation order
    pub tables: Vec<TableMetadata>,
    /// Capped products that sold out
    pub sold_out_products: usize,
    /// Realised correlations, when orders were generated
    pub correlations: CorrelationReport,
    /// Total wall-clock time
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl RunReport {
    /// Records produced for `table`
    pub fn records(&self, table: TableName) -> usize {
        self.tables.iter().find(|t| t.table == table).map_or(0, |t| t.records)
    }

    /// Total records across all tables
    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.records).sum()
    }

    /// Generate a compact one-line summary suitable for logging
    pub fn compact_summary(&self) -> String {
        format!(
            "Scenario '{}' ({}): {} hours, {} records in {} tables, {:.2}s",
            self.scenario,
            self.kind,
            self.hours,
            self.total_records(),
            self.tables.len(),
            self.duration.as_secs_f64()
        )
    }

    /// Generate a multi-line report for the console
    pub fn summary_report(&self) -> String {
        let mut output = String::new();
        output.push_str("=== Generation Report ===\n");
        output.push_str(&format!("Scenario: {} ({})\n", self.scenario, self.kind));
        output.push_str(&format!("Window: {} to {} ({} hours)\n", self.start, self.end, self.hours));
        output.push_str(&format!("Seed: {} | Workers: {}\n\n", self.seed, self.workers));

        output.push_str("Tables:\n");
        for table in &self.tables {
            output.push_str(&format!(
                "  - {:<18} {:>10} records  {:>8} ms\n",
                table.table.as_str(),
                table.records,
                table.duration.as_millis()
            ));
        }
        if self.sold_out_products > 0 {
            output.push_str(&format!("\nSold-out capped products: {}\n", self.sold_out_products));
        }

        if !self.correlations.pairs.is_empty() {
            output.push_str("\nHourly correlations (target / realised):\n");
            for pair in &self.correlations.pairs {
                let realised = pair.realised.map_or_else(|| "n/a".to_string(), |r| format!("{:+.2}", r));
                output.push_str(&format!("  - {:<22} {:+.2} / {}\n", pair.pair, pair.target, realised));
            }
        }

        output.push_str(&format!("\n{}\n", self.compact_summary()));
        output
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary_report())
    }
}
