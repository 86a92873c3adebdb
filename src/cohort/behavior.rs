//! Cohort behavior lookup tables
//!
//! Maps each generational cohort to its population share, relative shopping
//! activity and the channel, payment and support-contact distributions used
//! when generating customers, orders, tickets and abandoned carts.

use serde::{Deserialize, Serialize};

use crate::cohort::{Distribution, DistributionError};
use crate::types::{AcquisitionChannel, Cohort, PaymentMethod, ShoppingChannel, SupportChannel};

/// Move of shopping-channel mass toward a newly launched channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelMigration {
    /// Channel whose users migrate
    pub source: ShoppingChannel,
    /// Channel receiving the migrated mass
    pub target: ShoppingChannel,
    /// Fraction of the source channel's share that moves (0.0-1.0)
    pub migration: f64,
    /// Fraction of every other channel's share that moves (0.0-1.0)
    pub cannibalization: f64,
}

/// Scenario-driven perturbation of the base cohort tables
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CohortAdjustment {
    /// Absolute amount added to the gen Z population share before renormalising
    pub gen_z_share_boost: f64,
    /// Multiplier on gen Z shopping activity (0.0 means unchanged)
    pub gen_z_activity_boost: f64,
    /// Optional shopping-channel migration applied to every cohort
    pub migration: Option<ChannelMigration>,
}

/// Behavioral tables for one cohort
#[derive(Debug, Clone)]
pub struct CohortProfile {
    /// Cohort this profile describes
    pub cohort: Cohort,
    /// Share of the customer population
    pub share: f64,
    /// Relative likelihood of a customer of this cohort placing an order
    pub activity_weight: f64,
    /// Parameters (alpha, beta) of the price-sensitivity Beta distribution
    pub price_sensitivity: (u32, u32),
    /// How customers were acquired
    pub acquisition: Distribution<AcquisitionChannel>,
    /// Channel used to shop
    pub shopping: Distribution<ShoppingChannel>,
    /// Payment method used at checkout
    pub payment: Distribution<PaymentMethod>,
    /// Channel used to contact support
    pub support: Distribution<SupportChannel>,
}

/// Immutable cohort lookup model
#[derive(Debug, Clone)]
pub struct CohortBehaviorModel {
    profiles: Vec<CohortProfile>,
    population: Distribution<Cohort>,
    activity: Distribution<Cohort>,
}

impl CohortBehaviorModel {
    /// Standard tables: gen Z 28%, millennial 35%, gen X 25%, boomer 12%
    pub fn standard() -> Result<Self, DistributionError> {
        use AcquisitionChannel as Acq;
        use PaymentMethod as Pay;
        use ShoppingChannel as Shop;
        use SupportChannel as Sup;

        let profiles = vec![
            CohortProfile {
                cohort: Cohort::GenZ,
                share: 0.28,
                activity_weight: 1.1,
                price_sensitivity: (2, 5),
                acquisition: Distribution::new(&[
                    (Acq::PaidSocial, 0.40),
                    (Acq::Influencer, 0.35),
                    (Acq::Organic, 0.25),
                ])?,
                shopping: Distribution::new(&[
                    (Shop::MobileApp, 0.50),
                    (Shop::MobileWeb, 0.30),
                    (Shop::Web, 0.20),
                ])?,
                payment: Distribution::new(&[(Pay::Card, 0.40), (Pay::Bnpl, 0.40), (Pay::Upi, 0.20)])?,
                support: Distribution::new(&[
                    (Sup::Chat, 0.40),
                    (Sup::Whatsapp, 0.40),
                    (Sup::Email, 0.20),
                ])?,
            },
            CohortProfile {
                cohort: Cohort::Millennial,
                share: 0.35,
                activity_weight: 1.2,
                price_sensitivity: (3, 3),
                acquisition: Distribution::uniform(Acq::ALL)?,
                shopping: Distribution::new(&[
                    (Shop::Web, 0.40),
                    (Shop::MobileWeb, 0.35),
                    (Shop::MobileApp, 0.25),
                ])?,
                payment: Distribution::new(&[(Pay::Card, 0.60), (Pay::Upi, 0.25), (Pay::Cod, 0.15)])?,
                support: Distribution::new(&[(Sup::Email, 0.40), (Sup::Chat, 0.40), (Sup::Phone, 0.20)])?,
            },
            CohortProfile {
                cohort: Cohort::GenX,
                share: 0.25,
                activity_weight: 1.0,
                price_sensitivity: (3, 3),
                acquisition: Distribution::uniform(Acq::ALL)?,
                shopping: Distribution::new(&[
                    (Shop::Web, 0.40),
                    (Shop::MobileWeb, 0.35),
                    (Shop::MobileApp, 0.25),
                ])?,
                payment: Distribution::new(&[(Pay::Card, 0.60), (Pay::Upi, 0.25), (Pay::Cod, 0.15)])?,
                support: Distribution::new(&[(Sup::Email, 0.50), (Sup::Phone, 0.30), (Sup::Chat, 0.20)])?,
            },
            CohortProfile {
                cohort: Cohort::Boomer,
                share: 0.12,
                activity_weight: 0.8,
                price_sensitivity: (5, 2),
                acquisition: Distribution::new(&[
                    (Acq::Direct, 0.50),
                    (Acq::Organic, 0.30),
                    (Acq::Referral, 0.20),
                ])?,
                shopping: Distribution::new(&[(Shop::Web, 0.70), (Shop::MobileWeb, 0.30)])?,
                payment: Distribution::new(&[(Pay::Card, 0.60), (Pay::Upi, 0.25), (Pay::Cod, 0.15)])?,
                support: Distribution::new(&[(Sup::Phone, 0.70), (Sup::Email, 0.30)])?,
            },
        ];

        Self::from_profiles(profiles)
    }

    fn from_profiles(profiles: Vec<CohortProfile>) -> Result<Self, DistributionError> {
        let shares: Vec<(Cohort, f64)> = profiles.iter().map(|p| (p.cohort, p.share)).collect();
        let population = Distribution::new(&shares)?;
        let activity: Vec<(Cohort, f64)> =
            profiles.iter().map(|p| (p.cohort, p.share * p.activity_weight)).collect();
        let activity = Distribution::from_weights(&activity)?;
        Ok(Self { profiles, population, activity })
    }

    /// Standard tables with a scenario adjustment applied
    pub fn adjusted(adjustment: &CohortAdjustment) -> Result<Self, DistributionError> {
        let mut profiles = Self::standard()?.profiles;

        if adjustment.gen_z_share_boost != 0.0 {
            if !adjustment.gen_z_share_boost.is_finite() || adjustment.gen_z_share_boost < -0.28 {
                return Err(DistributionError::InvalidWeight(adjustment.gen_z_share_boost));
            }
            for profile in profiles.iter_mut() {
                if profile.cohort == Cohort::GenZ {
                    profile.share += adjustment.gen_z_share_boost;
                }
            }
            let total: f64 = profiles.iter().map(|p| p.share).sum();
            for profile in profiles.iter_mut() {
                profile.share /= total;
            }
        }

        if adjustment.gen_z_activity_boost > 0.0 {
            for profile in profiles.iter_mut() {
                if profile.cohort == Cohort::GenZ {
                    profile.activity_weight *= adjustment.gen_z_activity_boost;
                }
            }
        }

        if let Some(migration) = adjustment.migration {
            for profile in profiles.iter_mut() {
                profile.shopping = profile.shopping.reallocate(
                    migration.source,
                    migration.target,
                    migration.migration,
                    migration.cannibalization,
                )?;
            }
        }

        Self::from_profiles(profiles)
    }

    /// Profile for a cohort
    pub fn profile(&self, cohort: Cohort) -> &CohortProfile {
        // profiles are stored in Cohort::ALL order
        &self.profiles[cohort_index(cohort)]
    }

    /// All profiles in cohort order
    pub fn profiles(&self) -> &[CohortProfile] {
        &self.profiles
    }

    /// Distribution of cohorts across the customer population
    pub fn population(&self) -> &Distribution<Cohort> {
        &self.population
    }

    /// Distribution of cohorts across shopping sessions (share x activity)
    pub fn activity(&self) -> &Distribution<Cohort> {
        &self.activity
    }
}

/// Position of a cohort in `Cohort::ALL`
pub fn cohort_index(cohort: Cohort) -> usize {
    match cohort {
        Cohort::GenZ => 0,
        Cohort::Millennial => 1,
        Cohort::GenX => 2,
        Cohort::Boomer => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::PROBABILITY_TOLERANCE;

    #[test]
    fn test_standard_tables_are_valid() {
        let model = CohortBehaviorModel::standard().unwrap();
        assert_eq!(model.profiles().len(), 4);
        for (cohort, profile) in Cohort::ALL.iter().zip(model.profiles()) {
            assert_eq!(*cohort, profile.cohort);
            assert!((profile.shopping.total() - 1.0).abs() < PROBABILITY_TOLERANCE);
            assert!((profile.payment.total() - 1.0).abs() < PROBABILITY_TOLERANCE);
            assert!((profile.support.total() - 1.0).abs() < PROBABILITY_TOLERANCE);
        }
        assert!((model.population().probability(Cohort::Millennial) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_youngest_and_oldest_skews() {
        let model = CohortBehaviorModel::standard().unwrap();
        let gen_z = model.profile(Cohort::GenZ);
        assert!(gen_z.shopping.probability(ShoppingChannel::MobileApp) >= 0.5);
        assert!(gen_z.payment.probability(PaymentMethod::Bnpl) > 0.0);
        let boomer = model.profile(Cohort::Boomer);
        assert!(boomer.shopping.probability(ShoppingChannel::Web) >= 0.7);
        assert!(boomer.support.probability(SupportChannel::Phone) >= 0.7);
        assert_eq!(boomer.payment.probability(PaymentMethod::Bnpl), 0.0);
    }

    #[test]
    fn test_gen_z_growth_renormalises_shares() {
        let adjustment = CohortAdjustment { gen_z_share_boost: 0.15, ..Default::default() };
        let model = CohortBehaviorModel::adjusted(&adjustment).unwrap();
        let total: f64 = model.profiles().iter().map(|p| p.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((model.population().probability(Cohort::GenZ) - 0.43 / 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_channel_migration_keeps_distributions_normalised() {
        let adjustment = CohortAdjustment {
            migration: Some(ChannelMigration {
                source: ShoppingChannel::Web,
                target: ShoppingChannel::MobileApp,
                migration: 0.35,
                cannibalization: 0.15,
            }),
            ..Default::default()
        };
        let base = CohortBehaviorModel::standard().unwrap();
        let model = CohortBehaviorModel::adjusted(&adjustment).unwrap();
        for (before, after) in base.profiles().iter().zip(model.profiles()) {
            assert!((after.shopping.total() - 1.0).abs() < PROBABILITY_TOLERANCE);
            assert!(
                after.shopping.probability(ShoppingChannel::MobileApp)
                    > before.shopping.probability(ShoppingChannel::MobileApp)
            );
        }
        // boomers had no app share and gain one
        assert!(model.profile(Cohort::Boomer).shopping.probability(ShoppingChannel::MobileApp) > 0.2);
    }
}
