//! Return generation
//!
//! Only delivered orders are candidates, and only when the earliest allowed
//! return still falls inside the scenario window. A returned order produces
//! one record per line.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument};

use crate::cohort::{Distribution, DistributionError};
use crate::orders::OrderStream;
use crate::reference::ReferenceData;
use crate::scenario::{ReturnPolicy, ScenarioConfig};
use crate::simulation::{GenerationError, GenerationResult};
use crate::types::{
    Category, CustomerId, Money, OrderId, OrderItemId, ProductId, ReturnId, ReturnReason, ReturnStatus,
};

/// Share of delivered orders returned at a multiplier of 1.0
pub const BASE_RETURN_RATE: f64 = 0.08;
/// Share of the line's net amount refunded
pub const REFUND_SHARE: f64 = 0.95;
/// Share of returns processed by the end of their processing time
pub const COMPLETION_RATE: f64 = 0.9;

const SECONDS_PER_DAY: i64 = 86_400;

const CLOTHING_REASONS: &[(ReturnReason, f64)] = &[
    (ReturnReason::WrongSize, 0.4),
    (ReturnReason::NotAsDescribed, 0.3),
    (ReturnReason::ChangedMind, 0.2),
    (ReturnReason::Defective, 0.1),
];
const ELECTRONICS_REASONS: &[(ReturnReason, f64)] =
    &[(ReturnReason::Defective, 0.5), (ReturnReason::NotAsDescribed, 0.3), (ReturnReason::ChangedMind, 0.2)];
const GENERAL_REASONS: &[(ReturnReason, f64)] = &[
    (ReturnReason::NotAsDescribed, 0.3),
    (ReturnReason::Defective, 0.3),
    (ReturnReason::ChangedMind, 0.25),
    (ReturnReason::DamagedInShipping, 0.15),
];

/// One returned order line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    /// Unique identifier
    pub return_id: ReturnId,
    /// Delivered order the line belongs to
    pub order_id: OrderId,
    /// Returned line
    pub order_item_id: OrderItemId,
    /// Ordering customer
    pub customer_id: CustomerId,
    /// Returned product
    pub product_id: ProductId,
    /// Reason given
    pub return_reason: ReturnReason,
    /// Time the return was opened
    pub return_ts: DateTime<Utc>,
    /// Time processing finished, if inside the scenario window
    pub processed_ts: Option<DateTime<Utc>>,
    /// Amount refunded
    pub refund_amount: Money,
    /// Processing state at the end of the scenario window
    pub return_status: ReturnStatus,
    /// Days needed to process the return
    pub processing_days: u32,
}

/// Return generator over delivered orders
pub struct ReturnGenerator<'a> {
    config: &'a ScenarioConfig,
    reference: &'a ReferenceData,
    orders: &'a OrderStream,
    policy: ReturnPolicy,
    clothing: Distribution<ReturnReason>,
    electronics: Distribution<ReturnReason>,
    general: Distribution<ReturnReason>,
}

impl std::fmt::Debug for ReturnGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturnGenerator").field("policy", &self.policy).field("orders", &self.orders.len()).finish()
    }
}

impl<'a> ReturnGenerator<'a> {
    /// Create a generator
    pub fn new(
        config: &'a ScenarioConfig,
        reference: &'a ReferenceData,
        orders: &'a OrderStream,
    ) -> GenerationResult<Self> {
        let table = |e: DistributionError| GenerationError::entity_generation(format!("return reasons: {}", e));
        Ok(Self {
            config,
            reference,
            orders,
            policy: config.profile().return_policy(),
            clothing: Distribution::new(CLOTHING_REASONS).map_err(table)?,
            electronics: Distribution::new(ELECTRONICS_REASONS).map_err(table)?,
            general: Distribution::new(GENERAL_REASONS).map_err(table)?,
        })
    }

    fn reasons(&self, category: Category) -> &Distribution<ReturnReason> {
        match category {
            Category::Clothing => &self.clothing,
            Category::Electronics => &self.electronics,
            _ => &self.general,
        }
    }

    /// Whole days between delivery and the scenario end still available for a return
    fn available_days(&self, delivered: DateTime<Utc>) -> i64 {
        ((self.config.end() - delivered).num_seconds() - 1).max(-1) / SECONDS_PER_DAY
    }

    /// Generate the returns of the run ordered by return time
    #[instrument(skip_all, fields(scenario = %self.config.name(), orders = self.orders.len()))]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Return> {
        let products = &self.reference.products;
        let base_rate = BASE_RETURN_RATE * self.policy.rate_multiplier;
        let min_dwell = i64::from(self.policy.min_dwell_days);
        let mut returns = Vec::new();
        let mut eligible = 0usize;

        for (index, order) in self.orders.orders.iter().enumerate() {
            let Some(delivered) = order.delivered_ts.filter(|_| order.is_delivered()) else {
                continue;
            };
            let available = self.available_days(delivered);
            if available < min_dwell {
                continue;
            }
            eligible += 1;

            let lines = self.orders.item_range(index);
            let boosted = self.orders.item_products[lines.clone()]
                .iter()
                .any(|&p| self.policy.boosted_categories.contains(&products[p].category));
            let rate = if boosted { base_rate * 2.0 } else { base_rate };
            if !rng.gen_bool(rate.clamp(0.0, 1.0)) {
                continue;
            }

            let max_dwell = i64::from(self.policy.max_dwell_days).min(available).max(min_dwell);
            let return_ts = delivered + Duration::days(rng.gen_range(min_dwell..=max_dwell));
            let customer_id = order.customer_id;

            for line in lines {
                let item = &self.orders.items[line];
                let product = &products[self.orders.item_products[line]];
                let processing_days =
                    rng.gen_range(self.policy.min_processing_days..=self.policy.max_processing_days);
                let (return_status, processed_ts) = self.outcome(return_ts, processing_days, rng);

                returns.push(Return {
                    return_id: ReturnId::from_rng(rng),
                    order_id: order.order_id,
                    order_item_id: item.order_item_id,
                    customer_id,
                    product_id: product.product_id,
                    return_reason: self.reasons(product.category).sample(rng),
                    return_ts,
                    processed_ts,
                    refund_amount: item.net_amount().scale(REFUND_SHARE),
                    return_status,
                    processing_days,
                });
            }
        }

        returns.sort_by_key(|r| r.return_ts);
        info!("Generated {} returns from {} eligible delivered orders", returns.len(), eligible);
        returns
    }

    fn outcome<R: Rng + ?Sized>(
        &self,
        return_ts: DateTime<Utc>,
        processing_days: u32,
        rng: &mut R,
    ) -> (ReturnStatus, Option<DateTime<Utc>>) {
        if !rng.gen_bool(COMPLETION_RATE) {
            let status = if rng.gen_bool(0.5) { ReturnStatus::Approved } else { ReturnStatus::Requested };
            return (status, None);
        }
        let processed = return_ts + Duration::days(i64::from(processing_days));
        // still in processing when the window closes
        if processed >= self.config.end() {
            return (ReturnStatus::Approved, None);
        }
        let status = if rng.gen_bool(0.3) { ReturnStatus::Processed } else { ReturnStatus::Refunded };
        (status, Some(processed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::Fixture;
    use std::collections::HashMap;

    #[test]
    fn test_returns_reference_delivered_orders() {
        let fixture = Fixture::new("returns_wave", "5d");
        let returns = ReturnGenerator::new(&fixture.config, &fixture.reference, &fixture.orders)
            .unwrap()
            .generate(&mut fixture.rng());
        assert!(!returns.is_empty());

        let orders: HashMap<_, _> = fixture.orders.orders.iter().map(|o| (o.order_id, o)).collect();
        let mut refunded: HashMap<OrderId, Money> = HashMap::new();
        for ret in &returns {
            let order = orders[&ret.order_id];
            assert!(order.is_delivered());
            assert!(ret.return_ts > order.delivered_ts.unwrap());
            assert!(ret.return_ts < fixture.config.end());
            if let Some(processed) = ret.processed_ts {
                assert!(processed < fixture.config.end());
            }
            *refunded.entry(ret.order_id).or_insert(Money::ZERO) += ret.refund_amount;
        }
        for (order_id, refund) in refunded {
            assert!(refund <= orders[&order_id].total);
        }
    }

    #[test]
    fn test_returns_wave_processing_window() {
        let fixture = Fixture::new("returns_wave", "5d");
        let returns = ReturnGenerator::new(&fixture.config, &fixture.reference, &fixture.orders)
            .unwrap()
            .generate(&mut fixture.rng());
        assert!(returns.iter().all(|r| (5..=13).contains(&r.processing_days)));
    }
}
