//! Temporal intensity curve engine

pub mod intensity;
pub mod shape;

pub use intensity::{diurnal_multiplier, IntensityCurve, JITTER};
pub use shape::{CurveShape, SpikeShape};
