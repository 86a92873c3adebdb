//! Generation engine
//!
//! Runs the pipeline for one resolved scenario: reference data, intensity
//! curve, hourly plan and signals, orders, then the correlated entity tables.
//! Each phase reads what earlier phases produced and never changes it. The
//! engine performs no file I/O; tables are handed back to the caller.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::cohort::CohortBehaviorModel;
use crate::curve::IntensityCurve;
use crate::entities::metrics::bucket;
use crate::entities::{
    generate_metrics, AbandonmentGenerator, CartAbandonment, HourlySignals, Return, ReturnGenerator,
    SupportTicket, SystemMetric, TicketGenerator,
};
use crate::orders::{generate_orders, HourlyPlan, OrderEngine, OrderStream, RunState};
use crate::output::Table;
use crate::reference::{ReferenceData, ReferenceGenerator};
use crate::scenario::correlation::{ABANDONMENT, DELAY, ORDERS, SERIES_COUNT, SUPPORT};
use crate::scenario::{ScenarioConfig, ScenarioValidationError};
use crate::simulation::rng::{RngBank, StreamSlot};
use crate::simulation::statistics::{CorrelationReport, RunReport, TableMetadata};
use crate::simulation::GenerationResult;
use crate::types::TableName;

/// Tables and report of one run
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Selected tables by name
    pub tables: BTreeMap<TableName, Table>,
    /// Per-table metadata and realised correlations
    pub report: RunReport,
}

impl GenerationOutput {
    /// Table by name, when it was selected
    pub fn table(&self, name: TableName) -> Option<&Table> {
        self.tables.get(&name)
    }
}

/// Everything derived from the order stream
struct EventTables {
    orders: OrderStream,
    tickets: Vec<SupportTicket>,
    carts: Vec<CartAbandonment>,
    returns: Option<Vec<Return>>,
    metrics: Option<Vec<SystemMetric>>,
    timings: Vec<(TableName, Duration)>,
    sold_out: usize,
}

/// Orchestrates one generation run
#[derive(Debug)]
pub struct GenerationEngine {
    config: ScenarioConfig,
    workers: usize,
}

impl GenerationEngine {
    /// Engine for a resolved scenario, generating orders on the calling thread
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config, workers: 1 }
    }

    /// Use `workers` parallel order workers; output is deterministic per worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Scenario this engine runs
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Generate the selected tables
    #[instrument(skip(self), fields(scenario = %self.config.name(), seed = self.config.seed()))]
    pub fn run(&self, selection: &[TableName]) -> GenerationResult<GenerationOutput> {
        let started = Instant::now();
        let config = &self.config;
        let selected = |table: TableName| selection.contains(&table);
        let bank = RngBank::new(config.seed());
        let cohorts = CohortBehaviorModel::adjusted(&config.profile().cohort_adjustment())
            .map_err(ScenarioValidationError::from)?;

        info!(
            "Generating scenario '{}' ({}) over {} hours from {}",
            config.name(),
            config.kind().tag(),
            config.total_hours(),
            config.start()
        );

        let timer = Instant::now();
        let reference = {
            let _span = crate::perf_span!("reference_data", customers = config.volume().customers).entered();
            ReferenceGenerator::new(config, &cohorts, bank).generate()?
        };
        let reference_elapsed = timer.elapsed();

        let mut tables = BTreeMap::new();
        let mut timings: Vec<(TableName, Duration)> = Vec::new();
        let mut correlations = CorrelationReport::default();
        let mut sold_out_products = 0;

        if selected(TableName::Orders) || selected(TableName::OrderItems) {
            let events = self.generate_events(&reference, &cohorts, bank, selection)?;
            correlations = self.correlations(&events);
            sold_out_products = events.sold_out;
            timings.extend(events.timings);

            let mut event_tables = vec![
                Table::Orders(events.orders.orders),
                Table::OrderItems(events.orders.items),
                Table::SupportTickets(events.tickets),
                Table::CartAbandonment(events.carts),
            ];
            event_tables.extend(events.returns.map(Table::Returns));
            event_tables.extend(events.metrics.map(Table::SystemMetrics));
            for table in event_tables.into_iter().filter(|t| selected(t.name())) {
                tables.insert(table.name(), table);
            }
        } else {
            for table in selection.iter().copied().filter(TableName::requires_orders) {
                warn!("Table '{}' requires orders, which were not selected; returning it empty", table);
                tables.insert(table, Table::empty(table));
                timings.push((table, Duration::ZERO));
            }
        }

        let ReferenceData { customers, suppliers, products, campaigns } = reference;
        let reference_tables = [
            Table::Customers(customers),
            Table::Suppliers(suppliers),
            Table::Products(products),
            Table::Campaigns(campaigns),
        ];
        for table in reference_tables.into_iter().filter(|t| selected(t.name())) {
            timings.push((table.name(), reference_elapsed));
            tables.insert(table.name(), table);
        }

        let mut metadata: Vec<TableMetadata> = timings
            .into_iter()
            .filter_map(|(name, duration)| {
                tables.get(&name).map(|t| TableMetadata { table: name, records: t.len(), duration })
            })
            .collect();
        metadata.sort_by_key(|m| m.table);

        let report = RunReport {
            scenario: config.name().to_string(),
            kind: config.kind().tag(),
            seed: config.seed(),
            start: config.start(),
            end: config.end(),
            hours: config.total_hours(),
            workers: self.workers,
            tables: metadata,
            sold_out_products,
            correlations,
            duration: started.elapsed(),
        };
        crate::gen_event!(info, "Generation complete", records = report.total_records(), tables = tables.len());
        Ok(GenerationOutput { tables, report })
    }

    fn generate_events(
        &self,
        reference: &ReferenceData,
        cohorts: &CohortBehaviorModel,
        bank: RngBank,
        selection: &[TableName],
    ) -> GenerationResult<EventTables> {
        let config = &self.config;
        let mut timings = Vec::new();

        let timer = Instant::now();
        let curve = IntensityCurve::build(config, &mut bank.stream(StreamSlot::Curve));
        let mut state = RunState::new(&reference.products);
        let plan = HourlyPlan::build(&curve, config.volume().hourly_rate(), config.intensity(), &mut state);
        let signals = HourlySignals::build(config, &plan, &mut bank.stream(StreamSlot::Signals))?;
        let orders = {
            let _span = crate::perf_span!("orders", planned = plan.total(), workers = self.workers).entered();
            let engine = OrderEngine::new(config, reference, cohorts, signals.delay_probability())?;
            generate_orders(&engine, &plan, &mut state, bank, self.workers)?
        };
        let order_elapsed = timer.elapsed();
        timings.push((TableName::Orders, order_elapsed));
        timings.push((TableName::OrderItems, order_elapsed));

        let sold_out = (0..reference.products.len())
            .filter(|&p| state.inventory.is_capped(p) && !state.inventory.in_stock(p))
            .count();
        if sold_out > 0 {
            warn!("{} capped product(s) sold out during the scenario", sold_out);
        }

        let timer = Instant::now();
        let tickets = TicketGenerator::new(config, reference, cohorts, &orders)?
            .generate(&signals, &mut bank.stream(StreamSlot::Tickets));
        timings.push((TableName::SupportTickets, timer.elapsed()));

        let timer = Instant::now();
        let carts = AbandonmentGenerator::new(config, reference, cohorts)?
            .generate(&signals, &mut bank.stream(StreamSlot::Abandonment));
        timings.push((TableName::CartAbandonment, timer.elapsed()));

        let returns = if selection.contains(&TableName::Returns) {
            let timer = Instant::now();
            let returns =
                ReturnGenerator::new(config, reference, &orders)?.generate(&mut bank.stream(StreamSlot::Returns));
            timings.push((TableName::Returns, timer.elapsed()));
            Some(returns)
        } else {
            None
        };

        let metrics = if selection.contains(&TableName::SystemMetrics) {
            let timer = Instant::now();
            let metrics = generate_metrics(config, &orders, &tickets, &carts, &mut bank.stream(StreamSlot::Metrics));
            timings.push((TableName::SystemMetrics, timer.elapsed()));
            Some(metrics)
        } else {
            None
        };

        Ok(EventTables { orders, tickets, carts, returns, metrics, timings, sold_out })
    }

    fn correlations(&self, events: &EventTables) -> CorrelationReport {
        let config = &self.config;
        let to_f64 = |counts: Vec<u32>| counts.into_iter().map(f64::from).collect::<Vec<f64>>();

        let mut series: [Vec<f64>; SERIES_COUNT] = Default::default();
        series[ORDERS] = events.orders.hourly_counts().into_iter().map(|c| c as f64).collect();
        series[DELAY] = (0..events.orders.hours())
            .map(|h| events.orders.orders[events.orders.hour_range(h)].iter().filter(|o| o.is_delayed).count() as f64)
            .collect();
        series[SUPPORT] = to_f64(bucket(config, &events.tickets, |t| t.created_ts));
        series[ABANDONMENT] = to_f64(bucket(config, &events.carts, |c| c.abandon_ts));

        let report = CorrelationReport::measure(config.correlations(), &series);
        for pair in &report.pairs {
            if let Some(realised) = pair.realised {
                info!(pair = pair.pair, target = pair.target, realised, "Hourly correlation");
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioBuilder;
    use chrono::{TimeZone, Utc};

    fn engine(preset: &str, duration: &str) -> GenerationEngine {
        let config = ScenarioBuilder::preset(preset)
            .unwrap()
            .duration(duration)
            .customers(300)
            .product_count(150)
            .orders_per_hour(30.0)
            .start(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
            .seed(3)
            .build()
            .unwrap();
        GenerationEngine::new(config)
    }

    #[test]
    fn test_selected_tables_only() {
        let output = engine("baseline", "1d").run(&[TableName::Orders, TableName::Customers]).unwrap();
        assert_eq!(output.tables.len(), 2);
        assert!(output.table(TableName::OrderItems).is_none());
        assert_eq!(output.report.records(TableName::Customers), 300);
        assert!(output.report.records(TableName::Orders) > 0);
    }

    #[test]
    fn test_tables_needing_orders_are_empty_without_them() {
        let output = engine("baseline", "1d").run(&[TableName::Returns, TableName::Products]).unwrap();
        assert!(output.table(TableName::Returns).unwrap().is_empty());
        assert_eq!(output.table(TableName::Products).unwrap().len(), 150);
        assert!(output.report.correlations.pairs.is_empty());
    }

    #[test]
    fn test_full_run_reports_correlations() {
        let output = engine("baseline", "3d").run(TableName::ALL).unwrap();
        assert_eq!(output.tables.len(), TableName::ALL.len());
        assert_eq!(output.report.correlations.pairs.len(), 6);
        assert_eq!(output.report.records(TableName::SystemMetrics), 72);
    }
}
