// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use ecom_synth::*;

// Scenario resolution and volume behavior
mod scenario_file_tests;
mod scenario_volume_tests;

mod determinism_tests;
mod referential_integrity_tests;


#[test]
fn test_core_id_types() {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let customer_id = CustomerId::from_rng(&mut rng);
    let order_id = OrderId::from_rng(&mut rng);
    let product_id = ProductId::from_rng(&mut rng);

    assert_ne!(customer_id, CustomerId::from_rng(&mut rng));
    assert!(customer_id.to_string().starts_with("CUST_"));
    assert!(order_id.to_string().starts_with("ORD_"));
    assert!(product_id.to_string().starts_with("PROD_"));
}

#[test]
fn test_id_json_output_has_prefixes() {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(2);
    let order_id = OrderId::from_rng(&mut rng);

    let json = serde_json::to_string(&order_id).unwrap();
    assert!(json.contains("ORD_"));
    let deserialized: OrderId = serde_json::from_str(&json).unwrap();
    assert_eq!(order_id, deserialized);
}

#[test]
fn test_enum_labels() {
    for table in TableName::ALL {
        assert!(!table.to_string().is_empty());
    }
    for cohort in Cohort::ALL {
        let json = serde_json::to_string(cohort).unwrap();
        assert_eq!(json, format!("\"{}\"", cohort));
    }
}

#[test]
fn test_money_formatting() {
    let price = Money::from_amount(24.5);
    assert_eq!((price * 3).to_string(), "73.50");
    assert_eq!(serde_json::to_string(&price).unwrap(), "24.5");
}

#[test]
fn test_duration_months_are_thirty_days() {
    let duration: ScenarioDuration = "1m".parse().unwrap();
    assert_eq!(duration.total_hours(), 720);
}
