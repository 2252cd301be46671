//! Type II sum-of-squares decomposition of a one-factor linear model.

use crate::data::{DesignMatrix, GroupSample};
use crate::model::lm::model_lm;
use crate::test::anova::f_upper_tail;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the decomposition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTableRow {
    /// Source of variation (`C(NAME)` or `Residual`).
    pub source: String,
    /// Sum of squares.
    pub sum_sq: f64,
    /// Degrees of freedom.
    pub df: usize,
    /// F statistic (factor row only).
    pub f_statistic: Option<f64>,
    /// P-value (factor row only).
    pub p_value: Option<f64>,
}

/// Decomposition table: factor row followed by residual row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    factor: AnovaTableRow,
    residual: AnovaTableRow,
}

impl AnovaTable {
    /// Create a table from its factor and residual rows.
    pub fn new(factor: AnovaTableRow, residual: AnovaTableRow) -> Self {
        Self { factor, residual }
    }

    /// The factor row.
    pub fn factor(&self) -> &AnovaTableRow {
        &self.factor
    }

    /// The residual row.
    pub fn residual(&self) -> &AnovaTableRow {
        &self.residual
    }

    /// Rows in display order.
    pub fn rows(&self) -> [&AnovaTableRow; 2] {
        [&self.factor, &self.residual]
    }
}

/// Why the decomposition table could not be built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecompositionFailure {
    /// Fewer than two factor levels.
    TooFewLevels { levels: usize },
    /// No residual degrees of freedom left.
    Saturated { n_obs: usize, n_coefficients: usize },
    /// The normal equations could not be solved.
    SingularDesign,
    /// The model fits exactly, so F is undefined.
    ZeroResidual,
}

impl fmt::Display for DecompositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLevels { levels } => {
                write!(f, "need at least 2 factor levels, found {}", levels)
            }
            Self::Saturated {
                n_obs,
                n_coefficients,
            } => write!(
                f,
                "model is saturated ({} observations, {} coefficients)",
                n_obs, n_coefficients
            ),
            Self::SingularDesign => write!(f, "design matrix is singular"),
            Self::ZeroResidual => write!(f, "residual sum of squares is zero"),
        }
    }
}

/// Build the Type II table for `response ~ C(factor)` over `groups`.
///
/// With a single factor, Type II equals the sequential decomposition:
/// the factor sum of squares is RSS(intercept only) − RSS(full model).
pub fn anova_table(
    groups: &[&GroupSample],
    factor: &str,
) -> std::result::Result<AnovaTable, DecompositionFailure> {
    let n_levels = groups.iter().filter(|g| g.n() > 0).count();
    if n_levels < 2 {
        return Err(DecompositionFailure::TooFewLevels { levels: n_levels });
    }

    let mut labels: Vec<&str> = Vec::new();
    let mut y: Vec<f64> = Vec::new();
    for g in groups {
        for &v in &g.values {
            labels.push(g.group_id.as_str());
            y.push(v);
        }
    }

    let n_obs = y.len();
    let full_design = DesignMatrix::treatment_coded(factor, &labels)
        .map_err(|_| DecompositionFailure::TooFewLevels { levels: n_levels })?;
    if n_obs <= full_design.n_coefficients() {
        return Err(DecompositionFailure::Saturated {
            n_obs,
            n_coefficients: full_design.n_coefficients(),
        });
    }

    let full = model_lm(&y, &full_design).map_err(|e| {
        tracing::debug!(error = %e, "full model fit failed");
        DecompositionFailure::SingularDesign
    })?;
    let reduced = model_lm(&y, &DesignMatrix::intercept_only(n_obs))
        .map_err(|_| DecompositionFailure::SingularDesign)?;

    if full.rss <= 1e-12 * (1.0 + reduced.rss) {
        return Err(DecompositionFailure::ZeroResidual);
    }

    let ss_factor = (reduced.rss - full.rss).max(0.0);
    let df_factor = reduced.df_residual - full.df_residual;
    let df_resid = full.df_residual;
    let f_statistic = (ss_factor / df_factor as f64) / (full.rss / df_resid as f64);
    let p_value = f_upper_tail(f_statistic, df_factor as f64, df_resid as f64);

    Ok(AnovaTable::new(
        AnovaTableRow {
            source: format!("C({})", factor),
            sum_sq: ss_factor,
            df: df_factor,
            f_statistic: Some(f_statistic),
            p_value: Some(p_value),
        },
        AnovaTableRow {
            source: "Residual".to_string(),
            sum_sq: full.rss,
            df: df_resid,
            f_statistic: None,
            p_value: None,
        },
    ))
}
