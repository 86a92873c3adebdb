//! Tests for scenario resolution from the command line and from files
//!
//! These tests verify CLI parsing, custom scenario files and the precedence
//! of CLI flags over file values over preset defaults.

use clap::Parser;
use ecom_synth::scenario::{ScenarioBuilder, ScenarioFile, ScenarioKind};
use ecom_synth::simulation::GenerationError;
use ecom_synth::types::{Category, CliArgs, ConfigError, OutputFormat, TableName};
use std::fs;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

const OUTAGE_FILE: &str = r#"{
    "name": "checkout_incident",
    "kind": "payment_outage",
    "duration": "8h",
    "intensity_multiplier": 1.2,
    "seed": 99,
    "customers": 500,
    "overrides": { "outage_start_hour": 3, "outage_hours": 1 }
}"#;

#[test]
fn test_cli_parsing_defaults() {
    let args = CliArgs::try_parse_from(["ecom-synth"]).unwrap();
    assert!(args.scenario.is_none());
    assert_eq!(args.table_selection().unwrap(), TableName::ALL.to_vec());
    assert_eq!(args.output_format().unwrap(), OutputFormat::Csv);
    assert!(!args.dictionary);
}

#[test]
fn test_cli_parsing_overrides() {
    let args = CliArgs::try_parse_from([
        "ecom-synth",
        "flash_sale",
        "--discount",
        "60",
        "--category",
        "books",
        "--tables",
        "orders,order_items",
        "--output",
        "jsonl",
        "--workers",
        "4",
    ])
    .unwrap();
    assert_eq!(args.scenario.as_deref(), Some("flash_sale"));
    assert_eq!(args.workers, Some(4));
    assert_eq!(args.table_selection().unwrap(), vec![TableName::Orders, TableName::OrderItems]);

    let config = ScenarioBuilder::from_cli(&args).unwrap().build().unwrap();
    assert_eq!(config.focus_category(), Some(Category::Books));
    match config.kind() {
        ScenarioKind::FlashSale(overrides) => assert_eq!(overrides.discount_percent, 60.0),
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_custom_file_resolution() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "incident.json", OUTAGE_FILE);
    let args = CliArgs::try_parse_from(["ecom-synth", "custom", "--config", &path]).unwrap();

    let config = ScenarioBuilder::from_cli(&args).unwrap().build().unwrap();
    assert_eq!(config.name(), "checkout_incident");
    assert_eq!(config.total_hours(), 8);
    assert_eq!(config.seed(), 99);
    assert_eq!(config.volume().customers, 500);
    assert_eq!(config.kind().tag(), "payment_outage");
}

#[test]
fn test_cli_flags_beat_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "incident.json", OUTAGE_FILE);
    let args = CliArgs::try_parse_from([
        "ecom-synth",
        "custom",
        "--config",
        &path,
        "--duration",
        "2d",
        "--seed",
        "5",
    ])
    .unwrap();

    let config = ScenarioBuilder::from_cli(&args).unwrap().build().unwrap();
    assert_eq!(config.total_hours(), 48);
    assert_eq!(config.seed(), 5);
    assert_eq!(config.volume().customers, 500);
}

#[test]
fn test_file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(ScenarioFile::from_file(&missing), Err(ConfigError::FileNotFound(_))));

    let yaml = write_file(&dir, "scenario.yaml", "name: x");
    assert!(matches!(ScenarioFile::from_file(&yaml), Err(ConfigError::UnsupportedFormat(_))));

    let unknown_key = write_file(&dir, "typo.json", r#"{"name": "x", "kind": "baseline", "durration": "1d"}"#);
    assert!(matches!(ScenarioFile::from_file(&unknown_key), Err(ConfigError::JsonError(_))));
}

#[test]
fn test_invalid_overrides_fail_before_generation() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "bad.json",
        r#"{"name": "bad", "kind": "flash_sale", "overrides": {"discount_percent": -10}}"#,
    );
    let args = CliArgs::try_parse_from(["ecom-synth", "custom", "--config", &path]).unwrap();
    let result = ScenarioBuilder::from_cli(&args).and_then(|b| b.build().map_err(GenerationError::from));
    let err = result.unwrap_err();
    assert!(err.is_configuration(), "unexpected error {}", err);
}

#[test]
fn test_print_config_output_loads_back() {
    let args = CliArgs::try_parse_from(["ecom-synth", "viral_moment", "--seed", "12"]).unwrap();
    let config = ScenarioBuilder::from_cli(&args).unwrap().build().unwrap();

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "viral.json", &config.print_json().unwrap());
    let reloaded = ScenarioBuilder::from_scenario_file(ScenarioFile::from_file(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(reloaded.name(), config.name());
    assert_eq!(reloaded.seed(), 12);
    assert_eq!(reloaded.kind(), config.kind());
    assert_eq!(reloaded.total_hours(), config.total_hours());
}
