//! Grouping of a response variable's non-missing values by seedline.

use crate::data::table::TidyTable;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum group size for the normality test.
pub const MIN_NORMALITY_SIZE: usize = 3;

/// Minimum group size for homogeneity, ANOVA and post-hoc tests.
pub const MIN_GROUP_SIZE: usize = 2;

/// Non-missing values of one group for one response variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSample {
    /// Group identifier.
    pub group_id: String,
    /// Values in sheet order.
    pub values: Vec<f64>,
}

impl GroupSample {
    /// Create a group sample.
    pub fn new(group_id: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            group_id: group_id.into(),
            values,
        }
    }

    /// Number of observations.
    pub fn n(&self) -> usize {
        self.values.len()
    }

    /// Arithmetic mean (NaN for an empty group).
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sum of squared deviations from the group mean.
    pub fn sum_sq_dev(&self) -> f64 {
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean).powi(2)).sum()
    }
}

/// All groups of a response variable, ordered alphabetically by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedValues {
    /// Column the values come from.
    pub column: String,
    /// Groups with at least one non-missing value.
    pub groups: Vec<GroupSample>,
}

impl GroupedValues {
    /// Build from explicit group samples; groups are sorted by identifier.
    pub fn new(column: impl Into<String>, mut groups: Vec<GroupSample>) -> Self {
        groups.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        Self {
            column: column.into(),
            groups,
        }
    }

    /// Total number of non-missing observations.
    pub fn n_total(&self) -> usize {
        self.groups.iter().map(GroupSample::n).sum()
    }

    /// Check if the variable has no non-missing values.
    pub fn is_empty(&self) -> bool {
        self.n_total() == 0
    }

    /// Number of distinct values across all groups.
    pub fn n_distinct(&self) -> usize {
        let mut all: Vec<f64> = self.groups.iter().flat_map(|g| g.values.iter().copied()).collect();
        all.sort_by(f64::total_cmp);
        all.dedup();
        all.len()
    }

    /// Groups with at least `min_size` observations.
    pub fn eligible(&self, min_size: usize) -> Vec<&GroupSample> {
        self.groups.iter().filter(|g| g.n() >= min_size).collect()
    }
}

/// Group the non-missing values of `column` by group identifier.
pub fn group_values(table: &TidyTable, column: &str) -> Result<GroupedValues> {
    let mut by_group: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (group_id, value) in table.non_missing(column)? {
        by_group.entry(group_id).or_default().push(value);
    }
    let groups = by_group
        .into_iter()
        .map(|(id, values)| GroupSample::new(id, values))
        .collect();
    Ok(GroupedValues {
        column: column.to_string(),
        groups,
    })
}
