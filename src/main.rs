// ecom-synth - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/ecom-synth flash_sale --discount 60 --category electronics
// ```
//
// Or with a custom scenario file:
//
// ```console
// $ ./target/release/ecom-synth custom --config my-scenario.json --output jsonl --verbose
// ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use ecom_synth::scenario::{ScenarioBuilder, ScenarioConfig, ScenarioValidationError, PRESETS};
use ecom_synth::simulation::{GenerationEngine, LoggingConfig, RunReport};
use ecom_synth::output::TableWriter;
use ecom_synth::types::CliArgs;
use std::process;
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    if args.list {
        print_presets();
        return;
    }

    // Logging goes to stderr so --print-config output stays clean
    if let Err(e) = LoggingConfig::from_cli(&args).init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let tables = args.table_selection().map_err(ScenarioValidationError::InvalidSelection)?;
    let format = args.output_format().map_err(ScenarioValidationError::InvalidSelection)?;

    let config = ScenarioBuilder::from_cli(&args)?.build()?;
    info!("Scenario '{}' resolved and validated", config.name());

    if args.print_config {
        println!("{}", config.print_json()?);
        return Ok(());
    }

    if args.dry_run {
        eprintln!("Scenario validation successful!");
        eprintln!("Dry run mode - no data will be generated.");
        print_scenario_summary(&config, &args);
        return Ok(());
    }

    print_scenario_summary(&config, &args);

    let workers = args.workers.unwrap_or(1);
    let engine = GenerationEngine::new(config).with_workers(workers);
    eprintln!("Generating {} table(s)...", tables.len());
    let output = engine.run(&tables)?;

    let writer = TableWriter::new(&args.output_dir, format, engine.config().name(), Utc::now());
    let paths = writer
        .write_all(&output)
        .with_context(|| format!("failed to write tables to {}", args.output_dir))?;
    for path in &paths {
        eprintln!("  wrote {}", path.display());
    }
    if args.dictionary {
        let path = writer.write_dictionary(&tables).context("failed to write column dictionary")?;
        eprintln!("  wrote {}", path.display());
    }

    print_report(&output.report);
    info!("{}", output.report.compact_summary());
    Ok(())
}

/// Print the built-in presets
fn print_presets() {
    println!("Built-in scenarios:");
    for preset in PRESETS {
        println!("  {:<18} {:>5}  {}", preset.name, preset.duration, preset.description);
    }
    println!("  {:<18} {:>5}  Load a scenario file given with --config", "custom", "-");
}

/// Print the resolved scenario parameters
fn print_scenario_summary(config: &ScenarioConfig, args: &CliArgs) {
    let volume = config.volume();
    eprintln!("Scenario:");
    eprintln!("  Name: {} ({})", config.name(), config.kind().tag());
    eprintln!("  Window: {} to {} ({} hours)", config.start(), config.end(), config.total_hours());
    eprintln!("  Intensity: {:.2}", config.intensity());
    eprintln!("  Customers: {}", volume.customers);
    eprintln!("  Products: {}", volume.product_count);
    eprintln!("  Baseline Orders/Hour: {:.1}", volume.hourly_rate());
    if let Some(category) = config.focus_category() {
        eprintln!("  Focus Category: {}", category);
    }
    eprintln!("  Seed: {}", config.seed());
    eprintln!("  Output: {} in {}", args.output, args.output_dir);
    eprintln!(
        "\nEstimated Orders: ~{:.0}",
        volume.hourly_rate() * config.intensity() * config.total_hours() as f64
    );
    eprintln!();
}

/// Print the run report
fn print_report(report: &RunReport) {
    eprintln!("\n{}", report);
}
