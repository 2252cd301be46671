//! Raw rectangular sheet of text cells, as exported from the workbook.

use crate::error::{AnovaError, Result};
use std::io::Read;
use std::path::Path;

/// A raw grid of optional text cells with no header interpretation.
///
/// Rows may be ragged; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    rows: Vec<Vec<Option<String>>>,
}

impl RawSheet {
    /// Create a sheet from rows of cells.
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Create a sheet from string cells; empty or whitespace-only cells become `None`.
    pub fn from_str_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| cell(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Load a sheet from a CSV export on disk.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnovaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input sheet not found: {}", path.display()),
            )));
        }
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        Self::read_records(reader)
    }

    /// Load a sheet from any CSV byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        Self::read_records(reader)
    }

    fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(cell).collect());
        }
        if rows.is_empty() {
            return Err(AnovaError::EmptyData("Sheet has no rows".to_string()));
        }
        Ok(Self { rows })
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Width of the widest row among rows from `start` on.
    pub fn width_from(&self, start: usize) -> usize {
        self.rows
            .iter()
            .skip(start)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Get a cell, treating out-of-range positions as empty.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }
}

fn cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
