//! Tidy per-observation table built from a raw sheet.

use crate::data::schema::Schema;
use crate::data::sheet::RawSheet;
use crate::error::{AnovaError, Result};
use std::collections::HashSet;

/// Number of title/header rows at the top of the raw sheet.
pub const HEADER_ROWS: usize = 2;

/// One measured record: a seedline in one replication.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Seedline name, forward-filled from the nearest preceding row.
    pub group_id: String,
    /// Numeric fields in schema order (identifier excluded). `None` is missing.
    values: Vec<Option<f64>>,
}

impl Observation {
    /// Create an observation from its group and numeric values.
    pub fn new(group_id: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            group_id: group_id.into(),
            values,
        }
    }

    /// Value of the numeric field at `index` (numeric-field order).
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// All numeric values.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Tidy table: one row per observation, explicit schema, explicit missing values.
#[derive(Debug, Clone)]
pub struct TidyTable {
    schema: Schema,
    observations: Vec<Observation>,
}

impl TidyTable {
    /// Create a table from observations, checking each row matches the schema.
    pub fn new(schema: Schema, observations: Vec<Observation>) -> Result<Self> {
        let expected = schema.numeric_fields().count();
        for obs in &observations {
            if obs.values.len() != expected {
                return Err(AnovaError::SchemaMismatch {
                    expected: expected + 1,
                    actual: obs.values.len() + 1,
                });
            }
        }
        Ok(Self {
            schema,
            observations,
        })
    }

    /// The table's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// All observations in sheet order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.observations.len()
    }

    /// Distinct group identifiers in order of first appearance.
    pub fn group_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .map(|o| o.group_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// All values of a numeric column, missing included.
    pub fn column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Ok(self.observations.iter().map(|o| o.value(idx)).collect())
    }

    /// `(group_id, value)` pairs for a column, dropping missing values.
    pub fn non_missing(&self, name: &str) -> Result<Vec<(&str, f64)>> {
        let idx = self.column_index(name)?;
        Ok(self
            .observations
            .iter()
            .filter_map(|o| o.value(idx).map(|v| (o.group_id.as_str(), v)))
            .collect())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.schema
            .numeric_index(name)
            .ok_or_else(|| AnovaError::MissingColumn(name.to_string()))
    }
}

/// Normalize a raw sheet into a tidy table.
///
/// Drops the header rows, checks the sheet width against the schema,
/// forward-fills the group identifier, then coerces every other column to
/// numbers. Cells that do not parse become missing values.
pub fn normalize_sheet(sheet: &RawSheet, schema: &Schema) -> Result<TidyTable> {
    let n_data_rows = sheet.n_rows().saturating_sub(HEADER_ROWS);
    if n_data_rows == 0 {
        return Err(AnovaError::EmptyData(format!(
            "Sheet has no rows after the {} header rows",
            HEADER_ROWS
        )));
    }
    schema.validate_width(sheet.width_from(HEADER_ROWS))?;

    // Identifier first: later columns rely on every row having a group.
    let id_position = schema.identifier()?.position;
    let mut group_ids = Vec::with_capacity(n_data_rows);
    let mut last_seen: Option<&str> = None;
    for row in HEADER_ROWS..sheet.n_rows() {
        if let Some(id) = sheet.get(row, id_position) {
            last_seen = Some(id);
        }
        match last_seen {
            Some(id) => group_ids.push(id.to_string()),
            None => return Err(AnovaError::MissingGroupIdentifier { row: row + 1 }),
        }
    }

    let numeric_positions: Vec<usize> = schema.numeric_fields().map(|f| f.position).collect();
    let observations: Vec<Observation> = group_ids
        .into_iter()
        .enumerate()
        .map(|(i, group_id)| {
            let row = HEADER_ROWS + i;
            let values = numeric_positions
                .iter()
                .map(|&col| parse_numeric(sheet.get(row, col)))
                .collect();
            Observation::new(group_id, values)
        })
        .collect();

    tracing::debug!(
        rows = observations.len(),
        columns = schema.len(),
        "normalized sheet"
    );

    TidyTable::new(schema.clone(), observations)
}

/// Coerce a cell to a number; anything unparseable or non-finite is missing.
pub fn parse_numeric(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
