//! Target correlations between hourly entity volumes
//!
//! The targets steer the shared driving signals; they are not reproduced
//! exactly. Realised coefficients land within statistical tolerance of the
//! targets at best, and can drift further when scenario multipliers dominate.

use serde::{Deserialize, Serialize};

use crate::scenario::error::{ScenarioValidationError, ValidationResult};

/// Number of correlated series: orders, delivery delay, support, abandonment
pub const SERIES_COUNT: usize = 4;

/// Series index of hourly order volume
pub const ORDERS: usize = 0;
/// Series index of hourly delivery delay
pub const DELAY: usize = 1;
/// Series index of hourly support volume
pub const SUPPORT: usize = 2;
/// Series index of hourly cart abandonment
pub const ABANDONMENT: usize = 3;

/// Lower-triangular Cholesky factor of the target correlation matrix
pub type CholeskyFactor = [[f64; SERIES_COUNT]; SERIES_COUNT];

/// Pairwise correlation targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrelationTargets {
    /// Orders and support tickets
    pub orders_support: f64,
    /// Support tickets and delivery delays
    pub support_delay: f64,
    /// Orders and delivery delays
    pub orders_delay: f64,
    /// Orders and cart abandonment
    pub orders_abandonment: f64,
    /// Support tickets and cart abandonment
    pub support_abandonment: f64,
    /// Delivery delays and cart abandonment
    pub delay_abandonment: f64,
}

impl Default for CorrelationTargets {
    fn default() -> Self {
        Self {
            orders_support: 0.85,
            support_delay: 0.91,
            orders_delay: 0.72,
            orders_abandonment: -0.43,
            support_abandonment: -0.22,
            delay_abandonment: -0.15,
        }
    }
}

impl CorrelationTargets {
    /// Named pairs as `(label, first series, second series, target)`
    pub fn pairs(&self) -> [(&'static str, usize, usize, f64); 6] {
        [
            ("orders_support", ORDERS, SUPPORT, self.orders_support),
            ("support_delay", SUPPORT, DELAY, self.support_delay),
            ("orders_delay", ORDERS, DELAY, self.orders_delay),
            ("orders_abandonment", ORDERS, ABANDONMENT, self.orders_abandonment),
            ("support_abandonment", SUPPORT, ABANDONMENT, self.support_abandonment),
            ("delay_abandonment", DELAY, ABANDONMENT, self.delay_abandonment),
        ]
    }

    /// Symmetric correlation matrix over (orders, delay, support, abandonment)
    pub fn matrix(&self) -> [[f64; SERIES_COUNT]; SERIES_COUNT] {
        let mut m = [[0.0; SERIES_COUNT]; SERIES_COUNT];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        for (_, a, b, value) in self.pairs() {
            m[a][b] = value;
            m[b][a] = value;
        }
        m
    }

    /// Check ranges and joint achievability
    pub fn validate(&self) -> ValidationResult<()> {
        for (pair, _, _, value) in self.pairs() {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(ScenarioValidationError::InvalidCorrelation { pair, value });
            }
        }
        self.cholesky().map(|_| ())
    }

    /// Cholesky factor `L` with `L * L^T` equal to the target matrix
    pub fn cholesky(&self) -> ValidationResult<CholeskyFactor> {
        let m = self.matrix();
        let mut l = [[0.0; SERIES_COUNT]; SERIES_COUNT];
        for i in 0..SERIES_COUNT {
            for j in 0..=i {
                let dot: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
                if i == j {
                    let diagonal = m[i][i] - dot;
                    if diagonal <= 1e-9 {
                        return Err(ScenarioValidationError::CorrelationNotPositiveDefinite);
                    }
                    l[i][j] = diagonal.sqrt();
                } else {
                    l[i][j] = (m[i][j] - dot) / l[j][j];
                }
            }
        }
        Ok(l)
    }
}
