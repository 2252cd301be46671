//! Design matrix for a single categorical factor.

use crate::error::{AnovaError, Result};
use nalgebra::DMatrix;
use std::collections::BTreeSet;

/// A design matrix for linear modeling.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    /// The design matrix (observations × coefficients).
    matrix: DMatrix<f64>,
    /// Names of the coefficients (columns).
    coefficient_names: Vec<String>,
    /// Factor levels in sorted order; the first is the reference.
    levels: Vec<String>,
}

impl DesignMatrix {
    /// Intercept-only design for `n` observations.
    pub fn intercept_only(n: usize) -> Self {
        Self {
            matrix: DMatrix::from_element(n, 1, 1.0),
            coefficient_names: vec!["(Intercept)".to_string()],
            levels: Vec::new(),
        }
    }

    /// Treatment-coded design `~ C(factor)` with an intercept.
    ///
    /// The alphabetically first level is the reference; every other level
    /// gets a 0/1 indicator column named `C(factor)[T.level]`.
    pub fn treatment_coded(factor: &str, labels: &[&str]) -> Result<Self> {
        if labels.is_empty() {
            return Err(AnovaError::EmptyData(format!(
                "No observations for factor '{}'",
                factor
            )));
        }

        let levels: Vec<String> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect();

        let n = labels.len();
        let n_coef = levels.len();
        let mut matrix = DMatrix::zeros(n, n_coef);
        let mut coefficient_names = vec!["(Intercept)".to_string()];
        coefficient_names.extend(
            levels
                .iter()
                .skip(1)
                .map(|level| format!("C({})[T.{}]", factor, level)),
        );

        for (row, label) in labels.iter().enumerate() {
            matrix[(row, 0)] = 1.0;
            // Reference level keeps all indicators at zero.
            if let Some(pos) = levels.iter().position(|l| l.as_str() == *label) {
                if pos > 0 {
                    matrix[(row, pos)] = 1.0;
                }
            }
        }

        Ok(Self {
            matrix,
            coefficient_names,
            levels,
        })
    }

    /// Get the design matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Get coefficient names.
    pub fn coefficient_names(&self) -> &[String] {
        &self.coefficient_names
    }

    /// Factor levels, reference first.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// The reference level, if the design has a factor.
    pub fn reference_level(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }

    /// Number of observations (rows).
    pub fn n_samples(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of coefficients (columns).
    pub fn n_coefficients(&self) -> usize {
        self.matrix.ncols()
    }
}
