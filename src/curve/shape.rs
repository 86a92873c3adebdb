//! Scenario-specific shaping functions applied on top of the diurnal baseline

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use std::f64::consts::PI;
use std::ops::Range;

/// Exponential spike that decays back toward 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpikeShape {
    /// Multiplier reached at the end of the ramp
    pub peak: f64,
    /// Hours spent growing from 1.0 to `peak`
    pub ramp_hours: f64,
    /// E-folding time of the decay after the peak, in hours
    pub decay_hours: f64,
    /// Hard end of the event, if any
    pub event_hours: Option<usize>,
    /// Multiplier applied once the event has ended
    pub after_event: f64,
}

impl SpikeShape {
    /// Multiplier for hour `h` of the scenario
    pub fn multiplier(&self, hour: usize) -> f64 {
        if let Some(end) = self.event_hours {
            if hour >= end {
                return self.after_event;
            }
        }
        let h = hour as f64;
        if self.ramp_hours > 0.0 && h < self.ramp_hours {
            self.peak.powf(h / self.ramp_hours)
        } else {
            let since_peak = (h - self.ramp_hours).max(0.0);
            1.0 + (self.peak - 1.0) * (-since_peak / self.decay_hours.max(f64::EPSILON)).exp()
        }
    }
}

/// Shaping function selected by the scenario kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    /// Early exponential growth decaying toward 1.0
    Spike(SpikeShape),
    /// A contiguous window of hours suppressed by `factor`
    Disruption {
        /// Affected hours (scenario-relative, end-exclusive)
        window: Range<usize>,
        /// Multiplier inside the window
        factor: f64,
    },
    /// Uniform level with gentle weekly and whole-period variation
    Steady {
        /// Relative swing across the days of the week
        weekly_amplitude: f64,
        /// Relative rise toward the middle of the period
        period_amplitude: f64,
    },
}

impl CurveShape {
    /// Steady shape with the default weekly swing
    pub fn steady() -> Self {
        CurveShape::Steady { weekly_amplitude: 0.08, period_amplitude: 0.0 }
    }

    /// Multiplier for hour `h` of a run starting at `start` and lasting `total_hours`
    pub fn multiplier(&self, start: DateTime<Utc>, hour: usize, total_hours: usize) -> f64 {
        match self {
            CurveShape::Spike(spike) => spike.multiplier(hour),
            CurveShape::Disruption { window, factor } => {
                if window.contains(&hour) {
                    *factor
                } else {
                    1.0
                }
            }
            CurveShape::Steady { weekly_amplitude, period_amplitude } => {
                // variation only makes sense across several days
                if total_hours <= 24 {
                    return 1.0;
                }
                let at = start + Duration::hours(hour as i64);
                let weekday = at.weekday().num_days_from_monday() as f64;
                let weekly = weekly_amplitude * (2.0 * PI * weekday / 7.0).sin();
                let period = period_amplitude * (PI * hour as f64 / total_hours as f64).sin();
                1.0 + weekly + period
            }
        }
    }
}
