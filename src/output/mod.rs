//! Table container, column dictionary and file writer
//!
//! The engine hands finished tables over as [`Table`] values; the writer is
//! the only part of the crate that touches the file system.

pub mod schema;
pub mod table;
pub mod writer;

pub use schema::{dictionary, schema, Column, ColumnType, TableSchema};
pub use table::Table;
pub use writer::{csv_field, TableWriter, FILE_TIMESTAMP_FORMAT, LIST_SEPARATOR};
