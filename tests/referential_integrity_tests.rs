//! Tests for cross-table consistency
//!
//! Every foreign key must point at a record that exists and, for event
//! tables, at one that happened earlier. Money columns must satisfy the exact
//! order arithmetic, and returns may only refer to delivered orders.

use chrono::{TimeZone, Utc};
use ecom_synth::scenario::ScenarioBuilder;
use ecom_synth::simulation::{GenerationEngine, GenerationOutput};
use ecom_synth::types::{IssueCategory, OrderStatus, PaymentStatus};
use ecom_synth::{Money, Table, TableName};
use std::collections::{HashMap, HashSet};

fn run(preset: &str, duration: &str, workers: usize) -> GenerationOutput {
    let config = ScenarioBuilder::preset(preset)
        .unwrap()
        .duration(duration)
        .customers(600)
        .product_count(250)
        .orders_per_hour(25.0)
        .start(Utc.with_ymd_and_hms(2024, 9, 2, 0, 0, 0).unwrap())
        .seed(31)
        .build()
        .unwrap();
    GenerationEngine::new(config).with_workers(workers).run(TableName::ALL).unwrap()
}

macro_rules! table {
    ($output:expr, $variant:ident) => {
        match $output.table(TableName::$variant) {
            Some(Table::$variant(records)) => records,
            other => panic!("unexpected table {:?}", other.map(|t| t.name())),
        }
    };
}

#[test]
fn test_foreign_keys_resolve() {
    let output = run("returns_wave", "10d", 2);
    let customers: HashSet<_> = table!(output, Customers).iter().map(|c| c.customer_id).collect();
    let products: HashSet<_> = table!(output, Products).iter().map(|p| p.product_id).collect();
    let suppliers: HashSet<_> = table!(output, Suppliers).iter().map(|s| s.supplier_id).collect();
    let orders = table!(output, Orders);
    let order_ids: HashSet<_> = orders.iter().map(|o| o.order_id).collect();

    assert!(table!(output, Products).iter().all(|p| suppliers.contains(&p.supplier_id)));
    assert!(orders.iter().all(|o| customers.contains(&o.customer_id)));
    for item in table!(output, OrderItems) {
        assert!(order_ids.contains(&item.order_id));
        assert!(products.contains(&item.product_id));
    }
    for cart in table!(output, CartAbandonment) {
        assert!(customers.contains(&cart.customer_id));
        assert!(products.contains(&cart.product_id));
    }
}

#[test]
fn test_tickets_follow_their_orders() {
    let output = run("returns_wave", "5d", 1);
    let orders: HashMap<_, _> = table!(output, Orders).iter().map(|o| (o.order_id, o)).collect();
    let tickets = table!(output, SupportTickets);
    assert!(!tickets.is_empty());

    let mut delivery_links = (0, 0);
    for ticket in tickets {
        if let Some(order_id) = ticket.order_id {
            let order = orders[&order_id];
            assert!(order.order_ts <= ticket.created_ts);
            assert_eq!(order.customer_id, ticket.customer_id);
            if ticket.issue_category == IssueCategory::Delivery {
                delivery_links.0 += usize::from(order.is_delayed);
                delivery_links.1 += 1;
            }
        }
        if let Some(first_response) = ticket.first_response_ts {
            assert!(first_response >= ticket.created_ts);
        }
        if let Some(resolved) = ticket.resolved_ts {
            assert!(ticket.csat.is_some());
            assert!(resolved >= ticket.created_ts);
        }
    }
    // once delayed orders exist, delivery tickets attach to them
    let (delayed, linked) = delivery_links;
    assert!(linked == 0 || delayed * 2 >= linked, "{} of {} delivery tickets on delayed orders", delayed, linked);
}

#[test]
fn test_order_money_arithmetic_is_exact() {
    let output = run("flash_sale", "4h", 1);
    let items = table!(output, OrderItems);
    let mut by_order: HashMap<_, Vec<_>> = HashMap::new();
    for item in items {
        assert_eq!(item.line_total, item.unit_price * item.quantity);
        assert!(item.discount_amount <= item.line_total);
        by_order.entry(item.order_id).or_default().push(item);
    }

    for order in table!(output, Orders) {
        let lines = &by_order[&order.order_id];
        assert_eq!(order.item_count as usize, lines.len());
        assert_eq!(order.subtotal, lines.iter().map(|i| i.line_total).sum::<Money>());
        assert_eq!(order.discount_amount, lines.iter().map(|i| i.discount_amount).sum::<Money>());
        assert_eq!(order.total, order.subtotal - order.discount_amount);
        if order.payment_status == PaymentStatus::Failed {
            assert_eq!(order.status, OrderStatus::Cancelled);
        }
    }
}

#[test]
fn test_returns_only_for_delivered_orders() {
    let output = run("returns_wave", "14d", 2);
    let orders: HashMap<_, _> = table!(output, Orders).iter().map(|o| (o.order_id, o)).collect();
    let items: HashMap<_, _> = table!(output, OrderItems).iter().map(|i| (i.order_item_id, i)).collect();
    let returns = table!(output, Returns);
    assert!(!returns.is_empty(), "a two-week returns wave should produce returns");

    let mut refunded: HashMap<_, Money> = HashMap::new();
    for ret in returns {
        let order = orders[&ret.order_id];
        let item = items[&ret.order_item_id];
        assert!(order.is_delivered());
        assert_eq!(item.order_id, ret.order_id);
        assert_eq!(item.product_id, ret.product_id);
        assert_eq!(order.customer_id, ret.customer_id);
        assert!(Some(ret.return_ts) > order.delivered_ts);
        assert!(ret.refund_amount <= item.net_amount());
        *refunded.entry(ret.order_id).or_insert(Money::ZERO) += ret.refund_amount;
    }
    for (order_id, refund) in refunded {
        assert!(refund <= orders[&order_id].total);
    }
}

#[test]
fn test_events_stay_inside_the_window() {
    let output = run("payment_outage", "6h", 1);
    let (start, end) = (output.report.start, output.report.end);
    assert!(table!(output, Orders).iter().all(|o| o.order_ts >= start && o.order_ts < end));
    assert!(table!(output, SupportTickets).iter().all(|t| t.created_ts >= start && t.created_ts < end));
    assert!(table!(output, CartAbandonment).iter().all(|c| c.abandon_ts >= start && c.abandon_ts < end));
    for order in table!(output, Orders) {
        if let Some(delivered) = order.delivered_ts {
            assert!(delivered < end);
        }
    }
}
