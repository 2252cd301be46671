//! Explicit column schema for the seedline trial sheet.

use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};

/// Name of the group identifier column.
pub const GROUP_COLUMN: &str = "NAME";

/// Name of the replication column.
pub const REPLICATION_COLUMN: &str = "REPLICATION";

/// How a column's cells are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Categorical group label, forward-filled across blank cells.
    Identifier,
    /// Ordinal index (replication number), coerced like a measurement.
    Ordinal,
    /// Numeric measurement.
    Measurement,
}

/// A single column in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Zero-based position in the raw sheet.
    pub position: usize,
    /// Column name in the tidy table.
    pub name: String,
    /// Interpretation of the column.
    pub kind: FieldKind,
}

/// Ordered mapping from sheet positions to named, typed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema from `(name, kind)` pairs; positions follow list order.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = (S, FieldKind)>) -> Result<Self> {
        let fields: Vec<Field> = columns
            .into_iter()
            .enumerate()
            .map(|(position, (name, kind))| Field {
                position,
                name: name.into(),
                kind,
            })
            .collect();

        let n_identifiers = fields
            .iter()
            .filter(|f| f.kind == FieldKind::Identifier)
            .count();
        if n_identifiers != 1 {
            return Err(AnovaError::InvalidParameter(format!(
                "Schema needs exactly one identifier column, found {}",
                n_identifiers
            )));
        }

        Ok(Self { fields })
    }

    /// The 16-column layout of the forage seedline workbook.
    pub fn forage_seedlines() -> Self {
        let columns = [
            (GROUP_COLUMN, FieldKind::Identifier),
            (REPLICATION_COLUMN, FieldKind::Ordinal),
            ("PLANT_COUNT", FieldKind::Measurement),
            ("SEED_WEIGHT_g", FieldKind::Measurement),
            ("Avg_seed_weight_per_plant", FieldKind::Measurement),
            ("TOTAL_SEED_WEIGHT", FieldKind::Measurement),
            ("WET_BIOMASS_Q1", FieldKind::Measurement),
            ("WET_BIOMASS_Q2", FieldKind::Measurement),
            ("DRY_BIOMASS_Q1", FieldKind::Measurement),
            ("DRY_BIOMASS_Q2", FieldKind::Measurement),
            ("AVG_WETBM_QUAD", FieldKind::Measurement),
            ("AVG_WETBM_PLANT", FieldKind::Measurement),
            ("AVG_DRYBM_QUAD", FieldKind::Measurement),
            ("AVG_DRYBM_PLANT", FieldKind::Measurement),
            ("HARVESTED_PLANTS_Q1", FieldKind::Measurement),
            ("HARVESTED_PLANTS_Q2", FieldKind::Measurement),
        ];
        let fields = columns
            .iter()
            .enumerate()
            .map(|(position, (name, kind))| Field {
                position,
                name: name.to_string(),
                kind: *kind,
            })
            .collect();
        Self { fields }
    }

    /// All fields in position order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The identifier field.
    pub fn identifier(&self) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.kind == FieldKind::Identifier)
            .ok_or_else(|| AnovaError::MissingColumn(GROUP_COLUMN.to_string()))
    }

    /// Non-identifier fields, in position order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind != FieldKind::Identifier)
    }

    /// Index of a numeric column among the numeric fields.
    pub fn numeric_index(&self, name: &str) -> Option<usize> {
        self.numeric_fields().position(|f| f.name == name)
    }

    /// Check that a sheet of `width` columns lines up with this schema.
    pub fn validate_width(&self, width: usize) -> Result<()> {
        if width != self.fields.len() {
            return Err(AnovaError::SchemaMismatch {
                expected: self.fields.len(),
                actual: width,
            });
        }
        Ok(())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::forage_seedlines()
    }
}
