//! Rendering of analysis reports.
//!
//! The text layout is meant for people; JSON and YAML carry the same typed
//! report for downstream tools.

mod text;

pub use text::{render_text, write_text};

use crate::error::Result;
use crate::pipeline::AnalysisReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl ReportFormat {
    /// Get the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!(
                "unknown format '{}' (expected text, json or yaml)",
                other
            )),
        }
    }
}

/// Write `report` to `out` in the requested format.
pub fn write_report(
    report: &AnalysisReport,
    format: ReportFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        ReportFormat::Text => write_text(report, out),
        ReportFormat::Json => {
            writeln!(out, "{}", report.to_json()?)?;
            Ok(())
        }
        ReportFormat::Yaml => {
            write!(out, "{}", report.to_yaml()?)?;
            Ok(())
        }
    }
}
