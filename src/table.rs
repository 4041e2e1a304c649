//! CSV tables for the event and music-position streams.
//!
//! Cells are kept as strings so that a table can be written back with every
//! original column untouched; typed views are pulled out on demand.
use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::align::{MusicPositionSample, OnsetEvent};

/// An in-memory CSV table.
///
/// Headers are stored exactly as read so they are written back unchanged;
/// column lookups trim whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;

        let headers: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec.with_context(|| format!("{}: row {}", path.display(), i + 1))?;
            if rec.len() > headers.len() {
                bail!(
                    "{}: row {} has {} fields, header has {}",
                    path.display(),
                    i + 1,
                    rec.len(),
                    headers.len()
                );
            }
            let mut row: Vec<String> = rec.iter().map(str::to_string).collect();
            // Short rows are padded so every row has one cell per header.
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        tracing::debug!(path = %path.display(), cols = headers.len(), rows = rows.len(), "read table");
        Ok(Self { headers, rows })
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of column `name`, compared after trimming whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        match self.column_index(name) {
            Some(idx) => Ok(idx),
            None => bail!("missing column '{name}' (have: {})", self.headers.join(", ")),
        }
    }

    /// Keep only rows whose `column` cell is numerically equal to `trigger`.
    ///
    /// Empty and non-numeric cells never match, so rows with a missing
    /// trigger are dropped.
    pub fn filter_trigger(&self, column: &str, trigger: i64) -> Result<Self> {
        let idx = self.require_column(column)?;
        let target = trigger as f64;
        let rows = self
            .rows
            .iter()
            .filter(|row| parse_number(cell(row, idx)) == Some(target))
            .cloned()
            .collect();
        Ok(Self { headers: self.headers.clone(), rows })
    }

    /// Parse every cell of `column` as `f64`.
    pub fn f64_column(&self, column: &str) -> Result<Vec<f64>> {
        let idx = self.require_column(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| match parse_number(cell(row, idx)) {
                Some(v) => Ok(v),
                None => bail!("column '{column}', row {}: '{}' is not a number", i + 1, cell(row, idx)),
            })
            .collect()
    }
}

/// Cell `idx` of `row`, empty if the row is short.
pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", String::as_str)
}

/// Parse a numeric cell, ignoring surrounding whitespace.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Onset events from the `column` of an (already filtered) event table.
pub fn onset_events(table: &Table, column: &str) -> Result<Vec<OnsetEvent>> {
    Ok(table
        .f64_column(column)?
        .into_iter()
        .map(|onset_raw| OnsetEvent { onset_raw })
        .collect())
}

/// Music-position samples from the `column` of an (already filtered)
/// position table.
pub fn music_positions(table: &Table, column: &str) -> Result<Vec<MusicPositionSample>> {
    Ok(table
        .f64_column(column)?
        .into_iter()
        .map(|frame| MusicPositionSample { frame })
        .collect())
}
