//! Hourly system metrics
//!
//! One row per scenario hour, aggregated from the already generated event
//! tables. Load is the hour's order count relative to the configured baseline
//! rate; error rate and page load time rise with load, ticket pressure and
//! payment failures.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument};

use crate::entities::abandonment::CartAbandonment;
use crate::entities::support::SupportTicket;
use crate::orders::OrderStream;
use crate::scenario::ScenarioConfig;
use crate::types::PaymentStatus;

/// Page load time at baseline load, in seconds
pub const BASE_LOAD_TIME_SECS: f64 = 2.5;
/// Load beyond which page load time stops growing
pub const MAX_LOAD_FACTOR: f64 = 5.0;
/// Error rate of an idle system
pub const BASE_ERROR_RATE: f64 = 0.002;

const LOAD_TIME_NOISE: f64 = 0.05;

/// System health for one hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetric {
    /// Start of the hour
    pub hour_ts: DateTime<Utc>,
    /// Orders placed
    pub order_count: u32,
    /// Support tickets opened
    pub ticket_count: u32,
    /// Carts abandoned
    pub abandonment_count: u32,
    /// Orders whose delivery is delayed
    pub delayed_order_count: u32,
    /// Orders relative to the baseline hourly rate
    pub load_factor: f64,
    /// Share of requests failing
    pub error_rate: f64,
    /// Share of orders whose payment failed
    pub payment_failure_rate: f64,
    /// Abandoned carts as a share of checkout attempts
    pub cart_abandonment_rate: f64,
    /// Mean page load time in seconds
    pub site_load_time_s: f64,
}

/// Scenario hour of `ts`, when inside the window
pub(crate) fn hour_index(config: &ScenarioConfig, ts: DateTime<Utc>) -> Option<usize> {
    let seconds = (ts - config.start()).num_seconds();
    if seconds < 0 {
        return None;
    }
    let hour = (seconds / 3_600) as usize;
    (hour < config.total_hours()).then_some(hour)
}

/// Records per scenario hour
pub(crate) fn bucket<T>(config: &ScenarioConfig, records: &[T], ts: impl Fn(&T) -> DateTime<Utc>) -> Vec<u32> {
    let mut counts = vec![0u32; config.total_hours()];
    for record in records {
        if let Some(hour) = hour_index(config, ts(record)) {
            counts[hour] += 1;
        }
    }
    counts
}

/// Aggregate the hourly metrics of a run
#[instrument(skip_all, fields(hours = config.total_hours()))]
pub fn generate_metrics<R: Rng + ?Sized>(
    config: &ScenarioConfig,
    orders: &OrderStream,
    tickets: &[SupportTicket],
    carts: &[CartAbandonment],
    rng: &mut R,
) -> Vec<SystemMetric> {
    let ticket_counts = bucket(config, tickets, |t| t.created_ts);
    let cart_counts = bucket(config, carts, |c| c.abandon_ts);
    let baseline = config.volume().hourly_rate() * config.intensity();

    let metrics: Vec<SystemMetric> = (0..config.total_hours())
        .map(|hour| {
            let range = orders.hour_range(hour);
            let hour_orders = &orders.orders[range];
            let order_count = hour_orders.len() as u32;
            let delayed_order_count = hour_orders.iter().filter(|o| o.is_delayed).count() as u32;
            let failed = hour_orders.iter().filter(|o| o.payment_status == PaymentStatus::Failed).count();
            let ticket_count = ticket_counts[hour];
            let abandonment_count = cart_counts[hour];

            let load_factor = if baseline > 0.0 { order_count as f64 / baseline } else { 0.0 };
            let payment_failure_rate = if order_count > 0 { failed as f64 / order_count as f64 } else { 0.0 };
            let cart_abandonment_rate = if order_count + abandonment_count > 0 {
                abandonment_count as f64 / (order_count + abandonment_count) as f64
            } else {
                0.0
            };
            let ticket_pressure = ticket_count as f64 / (order_count as f64 + 1.0);
            let error_rate = (BASE_ERROR_RATE + 0.003 * load_factor + 0.25 * ticket_pressure
                + 0.5 * payment_failure_rate)
                .min(1.0);
            let noise = 1.0 + rng.gen_range(-LOAD_TIME_NOISE..LOAD_TIME_NOISE);
            let site_load_time_s = BASE_LOAD_TIME_SECS * load_factor.clamp(0.2, MAX_LOAD_FACTOR) * noise;

            SystemMetric {
                hour_ts: config.hour_start(hour),
                order_count,
                ticket_count,
                abandonment_count,
                delayed_order_count,
                load_factor,
                error_rate,
                payment_failure_rate,
                cart_abandonment_rate,
                site_load_time_s,
            }
        })
        .collect();

    info!("Generated {} hourly system metrics", metrics.len());
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::Fixture;

    #[test]
    fn test_one_row_per_hour_matching_orders() {
        let fixture = Fixture::new("baseline", "2d");
        let metrics = generate_metrics(&fixture.config, &fixture.orders, &[], &[], &mut fixture.rng());
        assert_eq!(metrics.len(), 48);
        let counted: u32 = metrics.iter().map(|m| m.order_count).sum();
        assert_eq!(counted as usize, fixture.orders.len());
        assert_eq!(metrics[1].hour_ts, fixture.config.hour_start(1));
        assert!(metrics.iter().all(|m| (0.0..=1.0).contains(&m.error_rate) && m.site_load_time_s > 0.0));
    }

    #[test]
    fn test_outage_hours_show_payment_failures() {
        let fixture = Fixture::new("payment_outage", "6h");
        let metrics = generate_metrics(&fixture.config, &fixture.orders, &[], &[], &mut fixture.rng());
        let outage = &metrics[1];
        let normal = &metrics[4];
        assert!(outage.payment_failure_rate > normal.payment_failure_rate);
        assert!(outage.error_rate > normal.error_rate);
    }
}
