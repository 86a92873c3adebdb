//! Batched order engine
//!
//! Orders are the highest-volume table and the driver for every other event
//! table. This module holds the records, the carried run state, the hourly
//! plan, the batch engine and the partitioned parallel runner.

pub mod engine;
pub mod parallel;
pub mod plan;
pub mod pool;
pub mod records;
pub mod state;

pub use engine::{
    mean_units_per_order, OrderEngine, BASE_PAYMENT_FAILURE_RATE, BATCH_SIZE, CANCELLATION_RATE,
    LINE_COUNT_WEIGHTS, QUANTITY_WEIGHTS,
};
pub use parallel::{generate_orders, max_workers};
pub use plan::HourlyPlan;
pub use pool::ProductPool;
pub use records::{Order, OrderItem, OrderStream};
pub use state::{InventoryLedger, RunState};
