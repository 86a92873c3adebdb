//! Partitioned order generation
//!
//! The hour range is split into contiguous sub-ranges of similar volume. Each
//! worker owns one sub-range, its own random stream and an even share of the
//! remaining inventory, so capped products cannot be oversold without any
//! cross-worker locking. Results are merged in hour order on the calling
//! thread, which keeps output identical for a fixed worker count.

use rayon::prelude::*;
use std::ops::Range;
use tracing::{info, instrument};

use crate::orders::engine::OrderEngine;
use crate::orders::plan::HourlyPlan;
use crate::orders::records::OrderStream;
use crate::orders::state::{InventoryLedger, RunState};
use crate::simulation::rng::{RngBank, StreamSlot};
use crate::simulation::{GenerationError, GenerationResult};

/// Workers allowed per available core
pub const WORKERS_PER_CORE: usize = 4;

/// Upper bound on the worker count
pub fn max_workers() -> usize {
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    cores * WORKERS_PER_CORE
}

fn run_chunk(
    engine: &OrderEngine<'_>,
    plan: &HourlyPlan,
    bank: RngBank,
    worker: usize,
    hours: Range<usize>,
    reservation: &InventoryLedger,
) -> GenerationResult<(OrderStream, InventoryLedger)> {
    let mut inventory = reservation.clone();
    let mut rng = bank.worker_stream(StreamSlot::Orders, worker);
    let chunk = engine.generate_range(hours, plan, &mut inventory, &mut rng)?;
    Ok((chunk, inventory))
}

/// Generate every planned order with `workers` workers (1 runs on the calling thread)
#[instrument(skip(engine, plan, state, bank), fields(total = plan.total()))]
pub fn generate_orders(
    engine: &OrderEngine<'_>,
    plan: &HourlyPlan,
    state: &mut RunState,
    bank: RngBank,
    workers: usize,
) -> GenerationResult<OrderStream> {
    let workers = workers.clamp(1, max_workers());
    let ranges = plan.partition(workers);
    let reservations = state.inventory.split(ranges.len());

    let results: Vec<(OrderStream, InventoryLedger)> = if ranges.len() == 1 {
        vec![run_chunk(engine, plan, bank, 0, ranges[0].clone(), &reservations[0])?]
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .build()
            .map_err(|e| GenerationError::worker(format!("failed to start worker pool: {}", e)))?;
        pool.install(|| {
            ranges
                .par_iter()
                .zip(reservations.par_iter())
                .enumerate()
                .map(|(worker, (hours, reservation))| {
                    run_chunk(engine, plan, bank, worker, hours.clone(), reservation)
                })
                .collect::<GenerationResult<Vec<_>>>()
        })?
    };

    let (chunks, leftovers): (Vec<OrderStream>, Vec<InventoryLedger>) = results.into_iter().unzip();
    state.inventory.reconcile(&reservations, &leftovers);
    let stream = OrderStream::concat(plan.hours(), chunks);

    info!(
        "Generated {} orders with {} items across {} worker(s)",
        stream.orders.len(),
        stream.items.len(),
        ranges.len()
    );
    Ok(stream)
}
