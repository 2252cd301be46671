//! Linear models for the one-factor layout.

pub mod anova_table;
pub mod lm;

pub use anova_table::{anova_table, AnovaTable, AnovaTableRow, DecompositionFailure};
pub use lm::{model_lm, LmFit};
