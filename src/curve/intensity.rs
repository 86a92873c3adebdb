//! Per-hour traffic intensity curve
//!
//! The curve is the product of three factors for every scenario hour:
//!
//! - a diurnal baseline (quiet overnight, busy in the afternoon) normalised to
//!   a mean of 1.0 so daily totals match the configured rate,
//! - the scenario kind's [`CurveShape`],
//! - a small multiplicative jitter drawn from the run's curve stream.
//!
//! The overall scenario intensity is not part of the curve; the order engine
//! applies it once when turning multipliers into counts.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::{debug, instrument};

use crate::curve::CurveShape;
use crate::scenario::ScenarioConfig;

/// Relative jitter applied to every hour
pub const JITTER: f64 = 0.05;

const DIURNAL_FLOOR: f64 = 0.3;
const DIURNAL_SWING: f64 = 0.7;
// mean of FLOOR + SWING * (0.5 + 0.5 * sin) over a full day
const DIURNAL_MEAN: f64 = DIURNAL_FLOOR + DIURNAL_SWING * 0.5;

/// Diurnal baseline multiplier for an hour of the day (0-23), mean 1.0
pub fn diurnal_multiplier(hour_of_day: u32) -> f64 {
    let phase = 2.0 * PI * (hour_of_day as f64 - 6.0) / 24.0;
    (DIURNAL_FLOOR + DIURNAL_SWING * (0.5 + 0.5 * phase.sin())) / DIURNAL_MEAN
}

/// Ordered per-hour multiplier sequence for one scenario run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityCurve {
    start: DateTime<Utc>,
    shape: CurveShape,
    values: Vec<f64>,
}

impl IntensityCurve {
    /// Build the curve for a scenario, drawing jitter from `rng`
    #[instrument(skip(config, rng), fields(scenario = %config.name(), hours = config.total_hours()))]
    pub fn build<R: Rng + ?Sized>(config: &ScenarioConfig, rng: &mut R) -> Self {
        let total_hours = config.total_hours();
        let shape = config.profile().curve_shape(total_hours);
        let start = config.start();

        let values: Vec<f64> = (0..total_hours)
            .map(|hour| {
                let at = start + Duration::hours(hour as i64);
                let jitter = 1.0 + rng.gen_range(-JITTER..=JITTER);
                let value = diurnal_multiplier(at.hour()) * shape.multiplier(start, hour, total_hours) * jitter;
                // guard against a degenerate shape factor
                if value.is_finite() && value > 0.0 {
                    value
                } else {
                    f64::MIN_POSITIVE
                }
            })
            .collect();

        let curve = Self { start, shape, values };
        debug!(
            "Built intensity curve: mean {:.3}, min {:.3}, max {:.3}",
            curve.mean(),
            curve.min(),
            curve.max()
        );
        curve
    }

    /// Shaping function the curve was built with
    pub fn shape(&self) -> &CurveShape {
        &self.shape
    }

    /// Start of hour 0
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// All multipliers in hour order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of hours
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the curve covers no hours
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Multiplier for `hour` (0.0 past the end)
    pub fn multiplier(&self, hour: usize) -> f64 {
        self.values.get(hour).copied().unwrap_or(0.0)
    }

    /// Mean multiplier
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioBuilder;
    use crate::simulation::rng::{RngBank, StreamSlot};
    use chrono::TimeZone;

    fn build(preset: &str, duration: &str, seed: u64) -> IntensityCurve {
        let config = ScenarioBuilder::preset(preset)
            .unwrap()
            .duration(duration)
            .start(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap())
            .seed(seed)
            .build()
            .unwrap();
        let mut rng = RngBank::new(seed).stream(StreamSlot::Curve);
        IntensityCurve::build(&config, &mut rng)
    }

    #[test]
    fn test_diurnal_mean_is_one() {
        let mean: f64 = (0..24).map(diurnal_multiplier).sum::<f64>() / 24.0;
        assert!((mean - 1.0).abs() < 1e-9);
        assert!(diurnal_multiplier(12) > diurnal_multiplier(0));
    }

    #[test]
    fn test_curve_covers_every_hour() {
        let curve = build("baseline", "3d", 7);
        assert_eq!(curve.len(), 72);
        assert!(curve.values().iter().all(|v| v.is_finite() && *v > 0.0));
        assert_eq!(curve.multiplier(72), 0.0);
    }

    #[test]
    fn test_same_seed_same_curve() {
        assert_eq!(build("flash_sale", "4h", 11), build("flash_sale", "4h", 11));
        assert_ne!(build("flash_sale", "4h", 11).values(), build("flash_sale", "4h", 12).values());
    }

    #[test]
    fn test_outage_hours_are_suppressed() {
        let curve = build("payment_outage", "6h", 3);
        // hours 1 and 2 carry the 0.2 suppression factor
        assert!(curve.multiplier(1) < curve.multiplier(0) * 0.5);
        assert!(curve.multiplier(2) < curve.multiplier(3) * 0.5);
    }
}
