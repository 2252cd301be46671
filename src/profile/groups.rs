//! Per-group descriptive statistics for a response variable.

use crate::data::{GroupSample, GroupedValues};
use serde::{Deserialize, Serialize};

/// Count, mean and sample standard deviation of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group identifier.
    pub group_id: String,
    /// Number of non-missing observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n − 1); undefined below two observations.
    pub std_dev: Option<f64>,
}

impl GroupSummary {
    /// Summarize one group sample.
    pub fn from_sample(sample: &GroupSample) -> Self {
        let count = sample.n();
        let std_dev = if count >= 2 {
            Some((sample.sum_sq_dev() / (count - 1) as f64).sqrt())
        } else {
            None
        };
        Self {
            group_id: sample.group_id.clone(),
            count,
            mean: sample.mean(),
            std_dev,
        }
    }
}

/// Summarize every group of a response variable, in group order.
pub fn profile_groups(grouped: &GroupedValues) -> Vec<GroupSummary> {
    grouped.groups.iter().map(GroupSummary::from_sample).collect()
}
