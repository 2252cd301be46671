//! Overview of the cleaned table: groups, rows and per-column coverage.

use crate::data::TidyTable;
use serde::{Deserialize, Serialize};

/// Sample size and mean of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverview {
    /// Column name.
    pub column: String,
    /// Number of non-missing values.
    pub n: usize,
    /// Mean of the non-missing values.
    pub mean: f64,
}

/// Summary of the tidy table printed before any test runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataOverview {
    /// Distinct group identifiers in order of first appearance.
    pub group_ids: Vec<String>,
    /// Number of rows.
    pub n_rows: usize,
    /// Columns with at least one value, in schema order.
    pub columns: Vec<ColumnOverview>,
}

impl DataOverview {
    /// Number of distinct groups.
    pub fn n_groups(&self) -> usize {
        self.group_ids.len()
    }
}

/// Profile the tidy table. Columns with no values are left out.
pub fn profile_overview(table: &TidyTable) -> DataOverview {
    let columns = table
        .schema()
        .numeric_fields()
        .enumerate()
        .filter_map(|(idx, field)| {
            let values: Vec<f64> = table
                .observations()
                .iter()
                .filter_map(|o| o.value(idx))
                .collect();
            if values.is_empty() {
                return None;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            Some(ColumnOverview {
                column: field.name.clone(),
                n: values.len(),
                mean,
            })
        })
        .collect();

    DataOverview {
        group_ids: table.group_ids().into_iter().map(String::from).collect(),
        n_rows: table.n_rows(),
        columns,
    }
}
