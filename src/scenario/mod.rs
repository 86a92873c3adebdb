//! Scenario definitions and resolution
//!
//! This module turns a preset name or a custom scenario file, plus any
//! command-line overrides, into a validated [`ScenarioConfig`]. Scenario kinds
//! are a closed set; each carries a typed override block and exposes its
//! behavior through [`ScenarioProfile`].

pub mod config;
pub mod correlation;
pub mod error;
pub mod kind;
pub mod presets;

pub use config::{
    ScenarioBuilder, ScenarioConfig, ScenarioFile, VolumeSettings, DEFAULT_CUSTOMERS, DEFAULT_DURATION,
    DEFAULT_ORDERS_PER_HOUR, DEFAULT_PRODUCT_COUNT,
};
pub use correlation::{CholeskyFactor, CorrelationTargets, SERIES_COUNT};
pub use error::{ScenarioValidationError, ValidationResult};
pub use kind::{
    BaselineOverrides, CampaignPlan, CustomerSegmentsOverrides, FeaturedProduct, FlashSaleOverrides, IssueMix,
    MultiChannelOverrides, PaymentOutageOverrides, ReturnPolicy, ReturnsWaveOverrides, ScenarioKind,
    ScenarioProfile, SeasonalPlanningOverrides, SupplyConstraint, SupplyDisruptionOverrides, ViralMomentOverrides,
};
pub use presets::{find_preset, ScenarioPreset, CUSTOM_SCENARIO, DEFAULT_SCENARIO, PRESETS};
