//! Correlated multi-entity generation
//!
//! Support tickets, abandoned carts, returns and system metrics are derived
//! from the order stream and from shared hourly signals rather than sampled
//! independently, so their volumes move with order volume and with each other.
//!
//! # Overview
//!
//! - **Signals**: latent per-hour drivers mixed to approximate the correlation targets
//! - **Support**: tickets linked to earlier (and, for delivery issues, delayed) orders
//! - **Abandonment**: carts abandoned in the funnel, payment-heavy during outages
//! - **Returns**: per-line returns of delivered orders
//! - **Metrics**: hourly load, error rate and page load time

pub mod abandonment;
pub mod metrics;
pub mod returns;
pub mod signals;
pub mod support;

#[cfg(test)]
pub(crate) mod test_support;

pub use abandonment::{AbandonmentGenerator, CartAbandonment, RECOVERY_RATE};
pub use metrics::{generate_metrics, SystemMetric};
pub use returns::{Return, ReturnGenerator, BASE_RETURN_RATE, REFUND_SHARE};
pub use signals::{abandonment_rate, round_with_carry, HourlySignals};
pub use support::{SupportTicket, TicketGenerator};
