//! Linear model fitting via OLS.

use crate::data::DesignMatrix;
use crate::error::{AnovaError, Result};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Results from fitting a linear model to one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LmFit {
    /// Coefficient names from the design matrix.
    pub coefficient_names: Vec<String>,
    /// Estimated coefficients.
    pub coefficients: Vec<f64>,
    /// Standard errors of coefficients.
    pub std_errors: Vec<f64>,
    /// Residuals.
    #[serde(skip)]
    pub residuals: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Residual standard error (sigma).
    pub sigma: f64,
    /// R-squared.
    pub r_squared: f64,
    /// Degrees of freedom (residual).
    pub df_residual: usize,
}

impl LmFit {
    /// Get coefficient index by name.
    pub fn coefficient_index(&self, name: &str) -> Option<usize> {
        self.coefficient_names.iter().position(|n| n == name)
    }

    /// Get a coefficient by name.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.coefficient_index(name)
            .and_then(|i| self.coefficients.get(i).copied())
    }
}

/// Fit `y` against the design matrix by ordinary least squares.
///
/// Solves the normal equations with (X'X)^-1; a singular design is an error.
pub fn model_lm(y: &[f64], design: &DesignMatrix) -> Result<LmFit> {
    let n_samples = y.len();
    let n_coef = design.n_coefficients();

    if design.n_samples() != n_samples {
        return Err(AnovaError::InvalidParameter(format!(
            "Design has {} rows but response has {} values",
            design.n_samples(),
            n_samples
        )));
    }

    let df_residual = n_samples.saturating_sub(n_coef);
    if df_residual == 0 {
        return Err(AnovaError::Numerical(
            "Model is saturated (n_samples <= n_coefficients)".to_string(),
        ));
    }

    let x = design.matrix();
    let xtx = x.transpose() * x;
    let xtx_inv = xtx.try_inverse().ok_or_else(|| {
        AnovaError::Numerical("Design matrix is singular (X'X not invertible)".to_string())
    })?;

    let y_vec = DVector::from_column_slice(y);

    // beta = (X'X)^-1 X'y
    let beta = &xtx_inv * (x.transpose() * &y_vec);
    let coefficients: Vec<f64> = beta.iter().copied().collect();

    let residuals_vec = &y_vec - x * &beta;
    let residuals: Vec<f64> = residuals_vec.iter().copied().collect();
    let rss: f64 = residuals.iter().map(|e| e * e).sum();
    let sigma = (rss / df_residual as f64).sqrt();

    let std_errors: Vec<f64> = (0..n_coef)
        .map(|j| sigma * xtx_inv[(j, j)].sqrt())
        .collect();

    let y_mean = y.iter().sum::<f64>() / n_samples as f64;
    let tss: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };

    Ok(LmFit {
        coefficient_names: design.coefficient_names().to_vec(),
        coefficients,
        std_errors,
        residuals,
        rss,
        sigma,
        r_squared,
        df_residual,
    })
}
