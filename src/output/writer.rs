//! CSV and JSON-lines table writer
//!
//! Files are named `{scenario}_{timestamp}_{table}.{ext}`, where the
//! timestamp is the time the writer was created, so all tables of one run
//! share it. CSV columns follow the column dictionary; missing values are
//! written as empty fields and list values are joined with `;`. Quoting is
//! left to the `csv` writer.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::output::schema::{dictionary, schema, ColumnType, TableSchema};
use crate::output::Table;
use crate::simulation::{GenerationError, GenerationOutput, GenerationResult};
use crate::types::{OutputFormat, TableName};

/// Timestamp format used in file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Separator for list values in CSV fields
pub const LIST_SEPARATOR: char = ';';

/// Writes generated tables into one directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    directory: PathBuf,
    format: OutputFormat,
    prefix: String,
}

impl TableWriter {
    /// Writer for the tables of `scenario`, stamped with `generated_at`
    pub fn new(
        directory: impl Into<PathBuf>,
        format: OutputFormat,
        scenario: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let prefix = format!("{}_{}", sanitize(scenario), generated_at.format(FILE_TIMESTAMP_FORMAT));
        Self { directory: directory.into(), format, prefix }
    }

    /// Output directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name of `table`
    pub fn file_name(&self, table: TableName) -> String {
        format!("{}_{}.{}", self.prefix, table, self.format.extension())
    }

    /// Write every table of a run, returning the written paths
    #[instrument(skip_all, fields(directory = %self.directory.display(), format = %self.format))]
    pub fn write_all(&self, output: &GenerationOutput) -> GenerationResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.directory)?;
        output.tables.values().map(|table| self.write_table(table)).collect()
    }

    /// Write one table
    pub fn write_table(&self, table: &Table) -> GenerationResult<PathBuf> {
        let path = self.directory.join(self.file_name(table.name()));
        let mut writer = BufWriter::new(File::create(&path)?);

        match self.format {
            OutputFormat::Csv => write_csv(&mut writer, schema(table.name()), table)?,
            OutputFormat::Jsonl => table.for_each_row(|row| {
                serde_json::to_writer(&mut writer, &row)?;
                writer.write_all(b"\n")?;
                Ok::<(), GenerationError>(())
            })?,
        }
        writer.flush()?;

        info!("Wrote {} {} records to {}", table.len(), table.name(), path.display());
        Ok(path)
    }

    /// Write the column dictionary of `tables` as JSON
    pub fn write_dictionary(&self, tables: &[TableName]) -> GenerationResult<PathBuf> {
        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(format!("{}_dictionary.json", self.prefix));
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &dictionary(tables))?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("Wrote column dictionary for {} tables to {}", tables.len(), path.display());
        Ok(path)
    }
}

/// Keep file names portable
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn write_csv<W: Write>(writer: W, schema: &TableSchema, table: &Table) -> GenerationResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(schema.column_names())?;

    let mut rows = 0usize;
    table.for_each_row(|row| {
        csv.write_record(schema.columns.iter().map(|column| {
            let value = row.get(column.name).unwrap_or(&Value::Null);
            csv_field(value, column.column_type)
        }))?;
        rows += 1;
        Ok::<(), GenerationError>(())
    })?;
    csv.flush()?;
    debug!(table = %schema.table, rows, "CSV rows written");
    Ok(())
}

/// Render a JSON value as an unescaped CSV field
pub fn csv_field(value: &Value, column_type: ColumnType) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if column_type == ColumnType::Money => {
            n.as_f64().map_or_else(|| n.to_string(), |amount| format!("{:.2}", amount))
        }
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(values) => values
            .iter()
            .map(|v| csv_field(v, column_type))
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string()),
        Value::Object(_) => value.to_string(),
    }
}
