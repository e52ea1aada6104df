//! CSV loading into in-memory records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::debug;

use crate::core::record::Record;

/// A fully materialized table: header names plus one record per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    /// Fail unless the header names `column`.
    ///
    /// This is the schema check for a ranking key; it runs once, before any
    /// row is looked at.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.headers.iter().any(|header| header == column) {
            return Ok(());
        }
        bail!(
            "required column '{}' not found in header [{}]",
            column,
            self.headers.join(", ")
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a headered CSV file from disk.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let table = parse_table(file).with_context(|| format!("parse {}", path.display()))?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "loaded table"
    );
    Ok(table)
}

/// Parse headered CSV from any reader.
///
/// Rows may be ragged: missing trailing fields read as empty strings and
/// fields past the last header are dropped. A UTF-8 byte order mark before the
/// first header is ignored.
pub fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("read csv header")?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("read csv row {}", index + 1))?;
        if row.len() != headers.len() {
            debug!(row = index + 1, fields = row.len(), "ragged csv row");
        }
        let values = row.iter().chain(std::iter::repeat(""));
        let record = Record::from_pairs(headers.iter().map(String::as_str).zip(values));
        records.push(record);
    }

    Ok(Table { headers, records })
}
