//! Report pipeline: runs the catalog's variables through the analysis steps.

mod runner;

pub use runner::{
    run_analysis, Analysis, AnalysisReport, Decomposition, Pipeline, PipelineStep, VariableReport,
};
