//! Shared hourly driving signals
//!
//! Every correlated series is derived from the standardised hourly order
//! count. The order signal is combined with independent standard normal noise
//! through the Cholesky factor of the target correlation matrix, giving one
//! latent signal per series whose pairwise correlations approximate the
//! targets. A negative target makes a series move against order volume, the
//! way abandoned carts pile up when fewer checkouts complete.
//!
//! This is a heuristic. Rounding, scenario multipliers and the clamp at zero
//! all pull realised coefficients away from the targets, so they are reported
//! afterwards rather than guaranteed.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::orders::HourlyPlan;
use crate::scenario::correlation::{ABANDONMENT, DELAY, ORDERS, SERIES_COUNT, SUPPORT};
use crate::scenario::{ScenarioConfig, ValidationResult};

/// Delivery delay probability at intensity 1.0
pub const BASE_DELAY_PROBABILITY: f64 = 0.05;
/// Ceiling on the load-driven part of the delay probability
pub const MAX_BASE_DELAY_PROBABILITY: f64 = 0.5;
/// Relative swing of the delay probability per unit of latent signal
pub const DELAY_VARIATION: f64 = 0.5;
/// Ceiling on the hourly delay probability
pub const MAX_DELAY_PROBABILITY: f64 = 0.95;
/// Share of orders that lead to a support contact
pub const SUPPORT_CONTACT_RATE: f64 = 0.12;
/// Share of support contacts that become tickets
pub const TICKET_CONVERSION: f64 = 0.85;
/// Cart abandonment rate at intensity 1.0
pub const BASE_ABANDONMENT_RATE: f64 = 0.25;
/// Drop in the abandonment rate per unit of extra intensity
pub const ABANDONMENT_INTENSITY_EFFECT: f64 = 0.43;

const MIN_VARIATION: f64 = 0.1;
const MAX_VARIATION: f64 = 1.0;

/// Abandoned carts as a share of checkout attempts at `intensity`
pub fn abandonment_rate(intensity: f64) -> f64 {
    BASE_ABANDONMENT_RATE * (1.0 - (intensity - 1.0) * ABANDONMENT_INTENSITY_EFFECT).max(0.05)
}

/// Latent signals and the per-hour targets derived from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySignals {
    latent: Vec<[f64; SERIES_COUNT]>,
    delay_probability: Vec<f64>,
    ticket_targets: Vec<f64>,
    abandonment_targets: Vec<f64>,
}

impl HourlySignals {
    /// Derive the signals from the hourly order plan
    #[instrument(skip_all, fields(hours = plan.hours()))]
    pub fn build<R: Rng + ?Sized>(config: &ScenarioConfig, plan: &HourlyPlan, rng: &mut R) -> ValidationResult<Self> {
        let factor = config.correlations().cholesky()?;
        let profile = config.profile();
        let counts = plan.counts();
        let hours = counts.len();

        let mean = plan.mean();
        let sd = if hours > 1 {
            let variance = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / (hours - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        // relative variation of order volume, reused for the dependent series
        let variation = if mean > 0.0 { (sd / mean).clamp(MIN_VARIATION, MAX_VARIATION) } else { MIN_VARIATION };

        let latent: Vec<[f64; SERIES_COUNT]> = counts
            .iter()
            .map(|&count| {
                let mut drivers = [0.0; SERIES_COUNT];
                drivers[ORDERS] = if sd > 0.0 { (count as f64 - mean) / sd } else { 0.0 };
                for driver in drivers.iter_mut().skip(1) {
                    *driver = rng.sample(StandardNormal);
                }
                let mut signal = [0.0; SERIES_COUNT];
                for (i, row) in factor.iter().enumerate() {
                    signal[i] = row.iter().zip(drivers.iter()).map(|(l, d)| l * d).sum();
                }
                signal
            })
            .collect();

        let intensity = config.intensity();
        let base_delay = (BASE_DELAY_PROBABILITY * intensity).min(MAX_BASE_DELAY_PROBABILITY);
        let ticket_mean = mean * SUPPORT_CONTACT_RATE * TICKET_CONVERSION;
        let rate = abandonment_rate(intensity);
        let abandonment_mean = mean * rate / (1.0 - rate);

        let mut delay_probability = Vec::with_capacity(hours);
        let mut ticket_targets = Vec::with_capacity(hours);
        let mut abandonment_targets = Vec::with_capacity(hours);
        for (hour, signal) in latent.iter().enumerate() {
            let delay = base_delay * (1.0 + DELAY_VARIATION * signal[DELAY]).max(0.0) + profile.delay_boost(hour);
            delay_probability.push(delay.clamp(0.0, MAX_DELAY_PROBABILITY));
            ticket_targets.push(
                ticket_mean * (1.0 + variation * signal[SUPPORT]).max(0.0) * profile.ticket_multiplier(hour),
            );
            abandonment_targets.push(
                abandonment_mean
                    * (1.0 + variation * signal[ABANDONMENT]).max(0.0)
                    * profile.abandonment_multiplier(hour),
            );
        }

        debug!(
            "Derived signals: order variation {:.3}, base delay {:.3}, abandonment rate {:.3}",
            variation, base_delay, rate
        );
        Ok(Self { latent, delay_probability, ticket_targets, abandonment_targets })
    }

    /// Number of hours
    pub fn hours(&self) -> usize {
        self.latent.len()
    }

    /// Latent signal of every series for `hour`
    pub fn latent(&self, hour: usize) -> Option<&[f64; SERIES_COUNT]> {
        self.latent.get(hour)
    }

    /// Delivery delay probability per hour
    pub fn delay_probability(&self) -> &[f64] {
        &self.delay_probability
    }

    /// Expected support tickets per hour
    pub fn ticket_targets(&self) -> &[f64] {
        &self.ticket_targets
    }

    /// Expected abandoned carts per hour
    pub fn abandonment_targets(&self) -> &[f64] {
        &self.abandonment_targets
    }
}

/// Round expected counts to whole counts, carrying the fractional remainder
pub fn round_with_carry(targets: &[f64]) -> Vec<usize> {
    let mut carry = 0.0;
    targets
        .iter()
        .map(|&target| {
            let wanted = target.max(0.0) + carry;
            let count = wanted.floor();
            carry = wanted - count;
            count as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioBuilder;
    use crate::simulation::rng::{RngBank, StreamSlot};
    use crate::simulation::statistics::pearson;

    fn signals(preset: &str, counts: Vec<usize>) -> HourlySignals {
        let config = ScenarioBuilder::preset(preset).unwrap().seed(5).build().unwrap();
        let plan = HourlyPlan::from_counts(counts);
        let mut rng = RngBank::new(5).stream(StreamSlot::Signals);
        HourlySignals::build(&config, &plan, &mut rng).unwrap()
    }

    fn wave(hours: usize) -> Vec<usize> {
        (0..hours).map(|h| (100.0 + 60.0 * (h as f64 * 0.26).sin()) as usize).collect()
    }

    #[test]
    fn test_targets_follow_correlation_signs() {
        let counts = wave(2_000);
        let s = signals("baseline", counts.clone());
        let orders: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let support = pearson(&orders, s.ticket_targets()).unwrap();
        let abandonment = pearson(&orders, s.abandonment_targets()).unwrap();
        assert!(support > 0.7, "orders/support {}", support);
        assert!(abandonment < -0.2, "orders/abandonment {}", abandonment);
    }

    #[test]
    fn test_delay_probability_is_bounded() {
        let s = signals("supply_disruption", wave(336));
        assert!(s.delay_probability().iter().all(|p| (0.0..=MAX_DELAY_PROBABILITY).contains(p)));
        // the disruption adds 0.3 from hour 24 on
        assert!(s.delay_probability()[100] >= 0.3);
    }

    #[test]
    fn test_round_with_carry_preserves_total() {
        let counts = round_with_carry(&[0.4; 10]);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_abandonment_rate_floor() {
        assert!((abandonment_rate(1.0) - 0.25).abs() < 1e-12);
        assert!((abandonment_rate(8.5) - 0.25 * 0.05).abs() < 1e-12);
    }
}
