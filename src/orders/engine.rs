//! Batched order construction
//!
//! Each hour's planned count is split into batches of at most [`BATCH_SIZE`]
//! orders. A batch draws its customers and line counts column-wise, then
//! assembles the orders and their lines. Only two pieces of state cross batch
//! boundaries: the inventory ledger and the product pool that mirrors it.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::Rng;
use std::ops::Range;
use tracing::{debug, instrument, warn};

use crate::cohort::{CohortBehaviorModel, Distribution};
use crate::orders::plan::HourlyPlan;
use crate::orders::pool::ProductPool;
use crate::orders::records::{Order, OrderItem, OrderStream};
use crate::orders::state::InventoryLedger;
use crate::reference::{Campaign, ReferenceData};
use crate::scenario::ScenarioConfig;
use crate::simulation::{GenerationError, GenerationResult};
use crate::types::{
    Money, OrderId, OrderItemId, OrderStatus, PaymentFailureReason, PaymentStatus, SessionId,
};

/// Maximum orders materialised together
pub const BATCH_SIZE: usize = 10_000;

/// Lines per order
pub const LINE_COUNT_WEIGHTS: &[(u32, f64)] = &[(1, 0.70), (2, 0.20), (3, 0.10)];

/// Units per line
pub const QUANTITY_WEIGHTS: &[(u32, f64)] = &[(1, 0.60), (2, 0.25), (3, 0.10), (4, 0.05)];

/// Payment failure rate outside an outage
pub const BASE_PAYMENT_FAILURE_RATE: f64 = 0.05;

/// Number of fulfilment warehouses
pub const WAREHOUSE_COUNT: u32 = 5;

/// Share of paid orders cancelled before shipping
pub const CANCELLATION_RATE: f64 = 0.02;

/// Hours after ordering before an order counts as shipped
pub const SHIP_AFTER_HOURS: i64 = 12;

/// Expected units per order implied by the line and quantity tables
pub fn mean_units_per_order() -> f64 {
    let lines: f64 = LINE_COUNT_WEIGHTS.iter().map(|&(n, p)| n as f64 * p).sum();
    let units: f64 = QUANTITY_WEIGHTS.iter().map(|&(n, p)| n as f64 * p).sum();
    lines * units
}

/// Fulfilment outcome of one order
struct Fulfilment {
    status: OrderStatus,
    promised: Option<DateTime<Utc>>,
    delivered: Option<DateTime<Utc>>,
    delay_hours: u32,
}

/// Order generator over read-only reference data
#[derive(Debug)]
pub struct OrderEngine<'a> {
    config: &'a ScenarioConfig,
    reference: &'a ReferenceData,
    cohorts: &'a CohortBehaviorModel,
    delay_probability: &'a [f64],
    customer_weights: WeightedIndex<f64>,
    lines: Distribution<u32>,
    quantities: Distribution<u32>,
}

impl<'a> OrderEngine<'a> {
    /// Create an engine; `delay_probability` holds the per-hour delivery delay probability
    pub fn new(
        config: &'a ScenarioConfig,
        reference: &'a ReferenceData,
        cohorts: &'a CohortBehaviorModel,
        delay_probability: &'a [f64],
    ) -> GenerationResult<Self> {
        if !reference.can_place_orders() {
            return Err(GenerationError::order_generation("orders need at least one customer and one product"));
        }
        let customer_weights = WeightedIndex::new(
            reference.customers.iter().map(|c| cohorts.profile(c.cohort).activity_weight),
        )
        .map_err(|e| GenerationError::order_generation(format!("customer activity weights: {}", e)))?;
        let lines = Distribution::new(LINE_COUNT_WEIGHTS)
            .map_err(|e| GenerationError::order_generation(format!("line counts: {}", e)))?;
        let quantities = Distribution::new(QUANTITY_WEIGHTS)
            .map_err(|e| GenerationError::order_generation(format!("quantities: {}", e)))?;

        Ok(Self { config, reference, cohorts, delay_probability, customer_weights, lines, quantities })
    }

    /// Generate the orders of a contiguous hour range against `inventory`
    #[instrument(skip(self, plan, inventory, rng), fields(start = hours.start, end = hours.end))]
    pub fn generate_range<R: Rng + ?Sized>(
        &self,
        hours: Range<usize>,
        plan: &HourlyPlan,
        inventory: &mut InventoryLedger,
        rng: &mut R,
    ) -> GenerationResult<OrderStream> {
        let products = &self.reference.products;
        let profile = self.config.profile();
        let mut stream = OrderStream::with_hours(hours.len());
        let mut pool = ProductPool::new(products, &profile.affected_categories(), inventory);
        if let (Some(featured), Some(index)) =
            (profile.featured_product(), products.iter().position(|p| p.featured))
        {
            pool = pool.with_featured(index, featured.demand_share, inventory);
        }

        for (local, hour) in hours.clone().enumerate() {
            let count = plan.counts().get(hour).copied().unwrap_or(0);
            let hour_start = self.config.hour_start(hour);
            let mut offsets: Vec<i64> = (0..count).map(|_| rng.gen_range(0..3_600)).collect();
            offsets.sort_unstable();

            for (batch, chunk) in offsets.chunks(BATCH_SIZE).enumerate() {
                self.generate_batch(hour, hour_start, chunk, &mut pool, inventory, rng, &mut stream);
                debug!(hour, batch, orders = chunk.len(), "Generated order batch");
            }
            stream.close_hour(local);
        }

        Ok(stream)
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_batch<R: Rng + ?Sized>(
        &self,
        hour: usize,
        hour_start: DateTime<Utc>,
        offsets: &[i64],
        pool: &mut ProductPool,
        inventory: &mut InventoryLedger,
        rng: &mut R,
        stream: &mut OrderStream,
    ) {
        let customers: Vec<usize> = offsets.iter().map(|_| self.customer_weights.sample(rng)).collect();
        let line_counts: Vec<u32> = offsets.iter().map(|_| self.lines.sample(rng)).collect();
        let products = &self.reference.products;

        for ((&offset, &customer_index), &line_count) in offsets.iter().zip(&customers).zip(&line_counts) {
            let order_ts = hour_start + Duration::seconds(offset);
            let order_id = OrderId::from_rng(rng);

            let mut items = Vec::with_capacity(line_count as usize);
            let mut campaign_id = None;
            for _ in 0..line_count {
                let Some(product_index) = pool.draw(rng) else {
                    break;
                };
                let quantity = inventory.take(product_index, self.quantities.sample(rng));
                if !inventory.in_stock(product_index) {
                    pool.exclude(product_index);
                    warn!("Product {} sold out at {}", products[product_index].sku, order_ts);
                }
                if quantity == 0 {
                    continue;
                }

                let product = &products[product_index];
                let line_total = product.price * quantity;
                let campaign = self.active_campaign(order_ts, product.category);
                let discount_amount = campaign.map_or(Money::ZERO, |c| line_total.scale(c.discount_rate));
                if campaign_id.is_none() {
                    campaign_id = campaign.map(|c| c.campaign_id);
                }

                items.push((
                    product_index,
                    OrderItem {
                        order_item_id: OrderItemId::from_rng(rng),
                        order_id,
                        product_id: product.product_id,
                        quantity,
                        unit_price: product.price,
                        line_total,
                        discount_amount,
                    },
                ));
            }
            // nothing left in stock to sell
            if items.is_empty() {
                continue;
            }

            let customer = &self.reference.customers[customer_index];
            let cohort = self.cohorts.profile(customer.cohort);
            let channel = cohort.shopping.sample(rng);
            let payment_method = cohort.payment.sample(rng);
            let (payment_status, payment_failure_reason) = self.payment_outcome(hour, rng);
            let fulfilment = self.fulfilment(hour, order_ts, payment_status, rng);

            let subtotal: Money = items.iter().map(|(_, item)| item.line_total).sum();
            let discount_amount: Money = items.iter().map(|(_, item)| item.discount_amount).sum();

            let order = Order {
                order_id,
                customer_id: customer.customer_id,
                order_ts,
                channel,
                session_id: SessionId::from_rng(rng),
                payment_method,
                payment_status,
                payment_failure_reason,
                campaign_id,
                subtotal,
                discount_amount,
                total: subtotal - discount_amount,
                item_count: items.len() as u32,
                status: fulfilment.status,
                warehouse_id: format!("WH_{:02}", rng.gen_range(1..=WAREHOUSE_COUNT)),
                promised_delivery_ts: fulfilment.promised,
                delivered_ts: fulfilment.delivered,
                is_delayed: fulfilment.delay_hours > 0,
                delay_hours: fulfilment.delay_hours,
            };
            stream.push(hour, customer_index, order, items);
        }
    }

    fn active_campaign(&self, ts: DateTime<Utc>, category: crate::types::Category) -> Option<&Campaign> {
        self.reference.campaigns.iter().find(|c| c.is_active(ts) && c.applies_to(category))
    }

    fn payment_outcome<R: Rng + ?Sized>(
        &self,
        hour: usize,
        rng: &mut R,
    ) -> (PaymentStatus, Option<PaymentFailureReason>) {
        match self.config.profile().payment_failure_rate(hour) {
            Some(rate) if rng.gen_bool(rate.clamp(0.0, 1.0)) => {
                (PaymentStatus::Failed, Some(PaymentFailureReason::GatewayDown))
            }
            Some(_) => (PaymentStatus::Success, None),
            None if rng.gen_bool(BASE_PAYMENT_FAILURE_RATE) => {
                let reason = if rng.gen_bool(0.5) {
                    PaymentFailureReason::InsufficientFunds
                } else {
                    PaymentFailureReason::ExpiredCard
                };
                (PaymentStatus::Failed, Some(reason))
            }
            None => (PaymentStatus::Success, None),
        }
    }

    fn fulfilment<R: Rng + ?Sized>(
        &self,
        hour: usize,
        order_ts: DateTime<Utc>,
        payment_status: PaymentStatus,
        rng: &mut R,
    ) -> Fulfilment {
        let cancelled =
            Fulfilment { status: OrderStatus::Cancelled, promised: None, delivered: None, delay_hours: 0 };
        if payment_status == PaymentStatus::Failed || rng.gen_bool(CANCELLATION_RATE) {
            return cancelled;
        }

        let promised = order_ts + Duration::days(rng.gen_range(1..=3));
        let p_delay = self.delay_probability.get(hour).copied().unwrap_or(0.0).clamp(0.0, 1.0);
        let delay_hours = if rng.gen_bool(p_delay) { rng.gen_range(12..=72) } else { 0 };
        let arrival = promised + Duration::hours(delay_hours as i64);
        let end = self.config.end();

        let (status, delivered) = if arrival < end {
            (OrderStatus::Delivered, Some(arrival))
        } else if order_ts + Duration::hours(SHIP_AFTER_HOURS) < end {
            (OrderStatus::Shipped, None)
        } else {
            (OrderStatus::Processing, None)
        };

        Fulfilment { status, promised: Some(promised), delivered, delay_hours }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_units_per_order() {
        assert!((mean_units_per_order() - 2.24).abs() < 1e-9);
    }
}
