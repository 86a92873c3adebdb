//! Tests for scenario-level order volumes
//!
//! These tests run whole scenarios and check the volume properties each
//! scenario kind promises: baseline totals, outage suppression, flash sale
//! curve sanity and the viral product inventory cap.

use chrono::{TimeZone, Utc};
use ecom_synth::curve::IntensityCurve;
use ecom_synth::scenario::ScenarioBuilder;
use ecom_synth::simulation::{GenerationEngine, RngBank, StreamSlot};
use ecom_synth::{Table, TableName};

fn midnight() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
}

/// Baseline preset: 10,000 customers, 2,500 orders/day over 30 days
#[test]
fn test_baseline_total_within_tolerance() {
    let config = ScenarioBuilder::preset("baseline").unwrap().start(midnight()).seed(2024).build().unwrap();
    assert_eq!(config.volume().customers, 10_000);
    assert_eq!(config.total_hours(), 720);

    let output = GenerationEngine::new(config).with_workers(4).run(&[TableName::Orders]).unwrap();
    let orders = output.report.records(TableName::Orders) as f64;
    let expected = 75_000.0;
    assert!(
        (orders - expected).abs() <= expected * 0.15,
        "baseline produced {} orders, expected {} +/- 15%",
        orders,
        expected
    );
}

/// Outage hours carry at most a quarter of the normal hourly volume
#[test]
fn test_payment_outage_suppresses_volume() {
    let config = ScenarioBuilder::preset("payment_outage")
        .unwrap()
        .orders_per_hour(200.0)
        .customers(2_000)
        .product_count(300)
        .start(midnight())
        .seed(77)
        .build()
        .unwrap();
    let output = GenerationEngine::new(config).run(&[TableName::Orders, TableName::SystemMetrics]).unwrap();

    let Some(Table::SystemMetrics(metrics)) = output.table(TableName::SystemMetrics) else {
        panic!("system metrics missing");
    };
    assert_eq!(metrics.len(), 6);
    let outage: Vec<f64> = metrics[1..3].iter().map(|m| m.order_count as f64).collect();
    let normal: Vec<f64> =
        metrics.iter().enumerate().filter(|(h, _)| !(1..3).contains(h)).map(|(_, m)| m.order_count as f64).collect();
    let normal_mean = normal.iter().sum::<f64>() / normal.len() as f64;
    for count in outage {
        assert!(count <= normal_mean * 0.25, "outage hour had {} orders vs normal mean {}", count, normal_mean);
    }
    assert!(metrics[1].payment_failure_rate > 0.5);
}

/// Flash sale multipliers are finite and positive, not necessarily monotonic
#[test]
fn test_flash_sale_curve_is_finite_and_positive() {
    for seed in [1u64, 2, 3, 4, 5] {
        let config = ScenarioBuilder::preset("flash_sale").unwrap().start(midnight()).seed(seed).build().unwrap();
        let curve = IntensityCurve::build(&config, &mut RngBank::new(seed).stream(StreamSlot::Curve));
        assert_eq!(curve.len(), 4);
        assert!(curve.values().iter().all(|m| m.is_finite() && *m > 0.0), "seed {}: {:?}", seed, curve.values());
    }
}

/// The viral product never sells more than its inventory
#[test]
fn test_viral_product_respects_inventory_cap() {
    let config = ScenarioBuilder::preset("viral_moment")
        .unwrap()
        .orders_per_hour(300.0)
        .customers(3_000)
        .product_count(400)
        .start(midnight())
        .seed(9)
        .build()
        .unwrap();
    let output = GenerationEngine::new(config)
        .with_workers(3)
        .run(&[TableName::Products, TableName::Orders, TableName::OrderItems])
        .unwrap();

    let Some(Table::Products(products)) = output.table(TableName::Products) else {
        panic!("products missing");
    };
    let featured = products.iter().find(|p| p.featured).expect("viral scenario has a featured product");
    assert_eq!(featured.inventory_cap, Some(500));

    let Some(Table::OrderItems(items)) = output.table(TableName::OrderItems) else {
        panic!("order items missing");
    };
    let sold: u32 = items.iter().filter(|i| i.product_id == featured.product_id).map(|i| i.quantity).sum();
    assert!(sold <= 500, "sold {} units of a 500-unit product", sold);
    assert!(sold > 0);
}
