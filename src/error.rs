//! Error types for the seedline-anova library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum AnovaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema mismatch: expected {expected} columns, sheet has {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Row {row} has no group identifier and no preceding row to inherit one from")]
    MissingGroupIdentifier { row: usize },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, AnovaError>;
