//! Statistical hypothesis tests for the one-way layout.


use statrs::distribution::Normal;

pub use anova::{test_anova_oneway, AnovaResult};
pub use homogeneity::{test_levene, HomogeneityVerdict, LeveneResult};
pub use normality::{
    diagnose_normality, test_shapiro, GroupNormality, NormalityDiagnostic, NormalityVerdict,
    ShapiroResult,
};
pub use tukey::{ptukey, qtukey, test_tukey_hsd, TukeyComparison, TukeyHsd};

/// Significance level used by every test and verdict.
pub const ALPHA: f64 = 0.05;

/// A p-value is significant when strictly below [`ALPHA`]. NaN never is.
pub fn is_significant(p_value: f64) -> bool {
    p_value < ALPHA
}

pub(crate) fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("unit normal parameters are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_boundary() {
        assert!(is_significant(0.049_999));
        assert!(!is_significant(0.05));
        assert!(!is_significant(0.2));
        assert!(!is_significant(f64::NAN));
    }
}
