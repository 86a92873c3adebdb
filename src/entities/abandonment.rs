//! Cart abandonment generation

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cohort::{CohortBehaviorModel, Distribution, DistributionError};
use crate::entities::signals::{round_with_carry, HourlySignals};
use crate::reference::ReferenceData;
use crate::scenario::ScenarioConfig;
use crate::simulation::{GenerationError, GenerationResult};
use crate::types::{AbandonReason, AbandonStage, AbandonmentId, CustomerId, Money, ProductId, ShoppingChannel};

/// Share of carts later recovered, outside outages
pub const RECOVERY_RATE: f64 = 0.1;

const ITEM_COUNT_WEIGHTS: &[(u32, f64)] = &[(1, 0.40), (2, 0.25), (3, 0.15), (4, 0.12), (5, 0.08)];
const STAGE_WEIGHTS: &[(AbandonStage, f64)] =
    &[(AbandonStage::Cart, 0.5), (AbandonStage::Checkout, 0.3), (AbandonStage::Payment, 0.2)];
const OUTAGE_STAGE_WEIGHTS: &[(AbandonStage, f64)] =
    &[(AbandonStage::Payment, 0.7), (AbandonStage::Checkout, 0.2), (AbandonStage::Cart, 0.1)];
const EVERYDAY_REASONS: &[AbandonReason] = &[
    AbandonReason::HighShipping,
    AbandonReason::PriceShopping,
    AbandonReason::NoPaymentMethod,
    AbandonReason::SlowSite,
    AbandonReason::Other,
];

/// An abandoned shopping cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartAbandonment {
    /// Unique identifier
    pub abandonment_id: AbandonmentId,
    /// Customer who abandoned the cart
    pub customer_id: CustomerId,
    /// Time the cart was abandoned
    pub abandon_ts: DateTime<Utc>,
    /// First product in the cart
    pub product_id: ProductId,
    /// Channel the cart was built on
    pub channel: ShoppingChannel,
    /// Funnel stage reached
    pub abandon_stage: AbandonStage,
    /// Reason for leaving
    pub abandon_reason: AbandonReason,
    /// Distinct products in the cart
    pub items_count: u32,
    /// Value of the cart
    pub cart_value: Money,
    /// Whether the cart was later recovered
    pub recovered: bool,
}

/// Abandoned cart generator
pub struct AbandonmentGenerator<'a> {
    config: &'a ScenarioConfig,
    reference: &'a ReferenceData,
    cohorts: &'a CohortBehaviorModel,
    items: Distribution<u32>,
    stages: Distribution<AbandonStage>,
    outage_stages: Distribution<AbandonStage>,
    reasons: Distribution<AbandonReason>,
}

fn table_error(name: &'static str) -> impl Fn(DistributionError) -> GenerationError {
    move |e| GenerationError::entity_generation(format!("{}: {}", name, e))
}

impl std::fmt::Debug for AbandonmentGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbandonmentGenerator").field("scenario", &self.config.name()).finish()
    }
}

impl<'a> AbandonmentGenerator<'a> {
    /// Create a generator
    pub fn new(
        config: &'a ScenarioConfig,
        reference: &'a ReferenceData,
        cohorts: &'a CohortBehaviorModel,
    ) -> GenerationResult<Self> {
        if !reference.can_place_orders() {
            return Err(GenerationError::entity_generation("abandoned carts need customers and products"));
        }
        Ok(Self {
            config,
            reference,
            cohorts,
            items: Distribution::new(ITEM_COUNT_WEIGHTS).map_err(table_error("cart items"))?,
            stages: Distribution::new(STAGE_WEIGHTS).map_err(table_error("abandon stages"))?,
            outage_stages: Distribution::new(OUTAGE_STAGE_WEIGHTS).map_err(table_error("outage stages"))?,
            reasons: Distribution::uniform(EVERYDAY_REASONS).map_err(table_error("abandon reasons"))?,
        })
    }

    /// Generate every abandoned cart of the run in hour order
    #[instrument(skip_all, fields(scenario = %self.config.name()))]
    pub fn generate<R: Rng + ?Sized>(&self, signals: &HourlySignals, rng: &mut R) -> Vec<CartAbandonment> {
        let counts = round_with_carry(signals.abandonment_targets());
        let mut carts = Vec::with_capacity(counts.iter().sum());

        for (hour, &count) in counts.iter().enumerate() {
            let outage = self.config.profile().in_outage(hour);
            let hour_start = self.config.hour_start(hour);
            let mut offsets: Vec<i64> = (0..count).map(|_| rng.gen_range(0..3_600)).collect();
            offsets.sort_unstable();

            for offset in offsets {
                carts.push(self.cart(hour_start + Duration::seconds(offset), outage, rng));
            }
            if outage && count > 0 {
                debug!(hour, carts = count, "Abandoned carts during outage");
            }
        }

        info!("Generated {} abandoned carts", carts.len());
        carts
    }

    fn cart<R: Rng + ?Sized>(&self, abandon_ts: DateTime<Utc>, outage: bool, rng: &mut R) -> CartAbandonment {
        let customers = &self.reference.customers;
        let products = &self.reference.products;
        let customer = &customers[rng.gen_range(0..customers.len())];
        let channel = self.cohorts.profile(customer.cohort).shopping.sample(rng);

        let (abandon_stage, abandon_reason) = if outage {
            let stage = self.outage_stages.sample(rng);
            let reason =
                if stage == AbandonStage::Payment { AbandonReason::PaymentFailed } else { AbandonReason::TechnicalIssue };
            (stage, reason)
        } else {
            (self.stages.sample(rng), self.reasons.sample(rng))
        };

        let items_count = self.items.sample(rng);
        let mut product_id = None;
        let mut cart_value = Money::ZERO;
        for _ in 0..items_count {
            let product = &products[rng.gen_range(0..products.len())];
            product_id.get_or_insert(product.product_id);
            cart_value += product.price * rng.gen_range(1..=2);
        }

        CartAbandonment {
            abandonment_id: AbandonmentId::from_rng(rng),
            customer_id: customer.customer_id,
            abandon_ts,
            product_id: product_id.unwrap_or(products[0].product_id),
            channel,
            abandon_stage,
            abandon_reason,
            items_count,
            cart_value,
            recovered: !outage && rng.gen_bool(RECOVERY_RATE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::Fixture;

    #[test]
    fn test_outage_carts_fail_at_payment_or_technically() {
        let fixture = Fixture::new("payment_outage", "6h");
        let generator = AbandonmentGenerator::new(&fixture.config, &fixture.reference, &fixture.cohorts).unwrap();
        let carts = generator.generate(&fixture.signals, &mut fixture.rng());
        assert!(!carts.is_empty());

        let outage_start = fixture.config.hour_start(1);
        let outage_end = fixture.config.hour_start(3);
        for cart in carts.iter().filter(|c| c.abandon_ts >= outage_start && c.abandon_ts < outage_end) {
            assert!(matches!(cart.abandon_reason, AbandonReason::PaymentFailed | AbandonReason::TechnicalIssue));
            assert!(!cart.recovered);
        }
    }

    #[test]
    fn test_carts_are_inside_window_with_value() {
        let fixture = Fixture::new("baseline", "2d");
        let generator = AbandonmentGenerator::new(&fixture.config, &fixture.reference, &fixture.cohorts).unwrap();
        let carts = generator.generate(&fixture.signals, &mut fixture.rng());
        for pair in carts.windows(2) {
            assert!(pair[0].abandon_ts <= pair[1].abandon_ts);
        }
        for cart in &carts {
            assert!(cart.abandon_ts >= fixture.config.start() && cart.abandon_ts < fixture.config.end());
            assert!((1..=5).contains(&cart.items_count));
            assert!(cart.cart_value > Money::ZERO);
        }
    }

    #[test]
    fn test_table_errors_name_the_table() {
        let err = Distribution::<u32>::new(&[]).map_err(table_error("cart items")).unwrap_err();
        assert!(err.to_string().contains("cart items"));
        assert!(err.to_string().contains("no outcomes"));
    }
}
