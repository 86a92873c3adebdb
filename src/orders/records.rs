//! Order and order line records

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{
    CampaignId, CustomerId, Money, OrderId, OrderItemId, OrderStatus, PaymentFailureReason, PaymentMethod,
    PaymentStatus, ProductId, SessionId, ShoppingChannel,
};

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Unique identifier
    pub order_id: OrderId,
    /// Ordering customer
    pub customer_id: CustomerId,
    /// Time the order was placed
    pub order_ts: DateTime<Utc>,
    /// Channel the order was placed through
    pub channel: ShoppingChannel,
    /// Browsing session that placed the order
    pub session_id: SessionId,
    /// Payment method used
    pub payment_method: PaymentMethod,
    /// Payment outcome
    pub payment_status: PaymentStatus,
    /// Why the payment failed, if it did
    pub payment_failure_reason: Option<PaymentFailureReason>,
    /// Campaign that discounted at least one line
    pub campaign_id: Option<CampaignId>,
    /// Sum of line totals
    pub subtotal: Money,
    /// Sum of line discounts
    pub discount_amount: Money,
    /// Amount charged: subtotal minus discount
    pub total: Money,
    /// Number of order lines
    pub item_count: u32,
    /// Fulfilment state at the end of the scenario
    pub status: OrderStatus,
    /// Fulfilling warehouse
    pub warehouse_id: String,
    /// Promised delivery time
    pub promised_delivery_ts: Option<DateTime<Utc>>,
    /// Delivery time, for delivered orders
    pub delivered_ts: Option<DateTime<Utc>>,
    /// Whether delivery misses the promised time
    pub is_delayed: bool,
    /// Hours by which delivery misses the promised time
    pub delay_hours: u32,
}

impl Order {
    /// Whether the order reached the customer inside the scenario window
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered && self.delivered_ts.is_some()
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    /// Unique identifier
    pub order_item_id: OrderItemId,
    /// Owning order
    pub order_id: OrderId,
    /// Ordered product
    pub product_id: ProductId,
    /// Units ordered
    pub quantity: u32,
    /// Price per unit
    pub unit_price: Money,
    /// Quantity times unit price
    pub line_total: Money,
    /// Campaign discount on this line
    pub discount_amount: Money,
}

impl OrderItem {
    /// Amount charged for the line after its discount
    pub fn net_amount(&self) -> Money {
        self.line_total - self.discount_amount
    }
}

/// Orders and items of a run plus the indices later generators need
#[derive(Debug, Clone, Default)]
pub struct OrderStream {
    /// Orders in timestamp order
    pub orders: Vec<Order>,
    /// Items grouped by order, in order sequence
    pub items: Vec<OrderItem>,
    /// Customer index of each order
    pub order_customers: Vec<usize>,
    /// Scenario hour of each order (absolute, also inside worker chunks)
    pub order_hours: Vec<usize>,
    /// Product index of each item
    pub item_products: Vec<usize>,
    /// `item_offsets[i]..item_offsets[i + 1]` are the items of order `i`
    pub item_offsets: Vec<usize>,
    /// `hour_offsets[h]..hour_offsets[h + 1]` are the orders of hour `h`
    pub hour_offsets: Vec<usize>,
}

impl OrderStream {
    /// Empty stream covering `hours` hours
    pub fn with_hours(hours: usize) -> Self {
        Self { item_offsets: vec![0], hour_offsets: vec![0; hours + 1], ..Default::default() }
    }

    /// Number of hours covered
    pub fn hours(&self) -> usize {
        self.hour_offsets.len().saturating_sub(1)
    }

    /// Number of orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Index range of the orders placed in `hour`
    pub fn hour_range(&self, hour: usize) -> std::ops::Range<usize> {
        match (self.hour_offsets.get(hour), self.hour_offsets.get(hour + 1)) {
            (Some(&start), Some(&end)) => start..end,
            _ => 0..0,
        }
    }

    /// Index range of the items of order `order`
    pub fn item_range(&self, order: usize) -> std::ops::Range<usize> {
        match (self.item_offsets.get(order), self.item_offsets.get(order + 1)) {
            (Some(&start), Some(&end)) => start..end,
            _ => 0..0,
        }
    }

    /// Orders per hour
    pub fn hourly_counts(&self) -> Vec<usize> {
        self.hour_offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Append one order with its items
    pub(crate) fn push(
        &mut self,
        hour: usize,
        customer: usize,
        order: Order,
        items: impl IntoIterator<Item = (usize, OrderItem)>,
    ) {
        for (product, item) in items {
            self.item_products.push(product);
            self.items.push(item);
        }
        self.item_offsets.push(self.items.len());
        self.orders.push(order);
        self.order_customers.push(customer);
        self.order_hours.push(hour);
    }

    /// Mark `hour` complete; every order pushed so far belongs to it or earlier hours
    pub(crate) fn close_hour(&mut self, hour: usize) {
        let len = self.orders.len();
        if let Some(offset) = self.hour_offsets.get_mut(hour + 1) {
            *offset = len;
        }
    }

    /// Concatenate worker chunks that cover consecutive hour ranges
    pub fn concat(hours: usize, chunks: Vec<OrderStream>) -> Self {
        let mut merged = OrderStream::with_hours(hours);
        let mut hour_base = 0;
        for chunk in chunks {
            let order_base = merged.orders.len();
            let item_base = merged.items.len();
            let chunk_hours = chunk.hours();
            let counts = chunk.hourly_counts();

            merged.orders.extend(chunk.orders);
            merged.items.extend(chunk.items);
            merged.order_customers.extend(chunk.order_customers);
            merged.order_hours.extend(chunk.order_hours);
            merged.item_products.extend(chunk.item_products);
            merged.item_offsets.extend(chunk.item_offsets.into_iter().skip(1).map(|o| o + item_base));

            let mut running = order_base;
            for (h, count) in counts.into_iter().enumerate() {
                running += count;
                if let Some(offset) = merged.hour_offsets.get_mut(hour_base + h + 1) {
                    *offset = running;
                }
            }
            hour_base += chunk_hours;
        }
        // hours no chunk covered stay empty
        let total = merged.orders.len();
        if let Some(rest) = merged.hour_offsets.get_mut(hour_base + 1..) {
            rest.iter_mut().for_each(|offset| *offset = total);
        }
        merged
    }
}
