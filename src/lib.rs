//! Seedline ANOVA Library
//!
//! One-way analysis of variance for forage seedline field trials: each
//! seedline is grown in several replications and a handful of plant and
//! biomass measurements are compared across seedlines.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Raw sheet loading, explicit schema, tidy table, variable catalog
//! - **profile**: Data overview and per-group summaries
//! - **test**: Hypothesis tests (Shapiro-Wilk, Levene, one-way ANOVA, Tukey HSD)
//! - **model**: Linear model fit and Type II decomposition table
//! - **pipeline**: Per-variable analysis sequence producing a typed report
//! - **report**: Text, JSON and YAML rendering to any writer
//!
//! # Example
//!
//! ```no_run
//! use seedline_anova::prelude::*;
//!
//! let sheet = RawSheet::from_csv("Forage_seedlines_copy.csv").unwrap();
//! let table = normalize_sheet(&sheet, &Schema::forage_seedlines()).unwrap();
//!
//! let report = Pipeline::default().run(&table).unwrap();
//! write_text(&report, &mut std::io::stdout()).unwrap();
//! ```

pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        group_values, normalize_sheet, GroupSample, GroupedValues, Observation, RawSheet,
        ResponseVariable, Schema, Tier, TidyTable, VariableCatalog,
    };
    pub use crate::error::{AnovaError, Result};
    pub use crate::model::{anova_table, model_lm, AnovaTable, DecompositionFailure, LmFit};
    pub use crate::pipeline::{
        run_analysis, Analysis, AnalysisReport, Pipeline, PipelineStep, VariableReport,
    };
    pub use crate::profile::{profile_groups, profile_overview, DataOverview, GroupSummary};
    pub use crate::report::{render_text, write_report, write_text, ReportFormat};
    pub use crate::test::{
        diagnose_normality, test_anova_oneway, test_levene, test_shapiro, test_tukey_hsd,
        AnovaResult, LeveneResult, NormalityDiagnostic, TukeyHsd, ALPHA,
    };
}
