//! Customer cohort behavior model
//!
//! Validated discrete distributions and the per-cohort lookup tables that
//! condition customer, order, ticket and abandonment choices.

pub mod behavior;
pub mod distribution;

pub use behavior::{
    cohort_index, ChannelMigration, CohortAdjustment, CohortBehaviorModel, CohortProfile,
};
pub use distribution::{Distribution, DistributionError, PROBABILITY_TOLERANCE};
