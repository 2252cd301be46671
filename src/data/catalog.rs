//! Catalog of response variables analyzed in each pass.

use crate::data::schema::Schema;
use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};

/// Analysis tier of a response variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Measured in every replication.
    Core,
    /// Measured in a subset of replications only (biomass).
    Supplementary,
}

impl Tier {
    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Supplementary => "supplementary",
        }
    }
}

/// A numeric column analyzed as a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseVariable {
    /// Column name in the tidy table.
    pub column: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Analysis tier.
    pub tier: Tier,
}

impl ResponseVariable {
    /// A core variable.
    pub fn core(column: &str) -> Self {
        Self {
            column: column.to_string(),
            label: None,
            tier: Tier::Core,
        }
    }

    /// A supplementary variable with a descriptive label.
    pub fn supplementary(column: &str, label: &str) -> Self {
        Self {
            column: column.to_string(),
            label: Some(label.to_string()),
            tier: Tier::Supplementary,
        }
    }

    /// Heading used in reports: `Label (COLUMN)` or just `COLUMN`.
    pub fn heading(&self) -> String {
        match &self.label {
            Some(label) => format!("{} ({})", label, self.column),
            None => self.column.clone(),
        }
    }
}

/// Ordered variable lists for the core and supplementary passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCatalog {
    core: Vec<ResponseVariable>,
    supplementary: Vec<ResponseVariable>,
}

impl VariableCatalog {
    /// Build a catalog, checking every variable carries the tier of its list.
    pub fn new(core: Vec<ResponseVariable>, supplementary: Vec<ResponseVariable>) -> Result<Self> {
        if let Some(v) = core.iter().find(|v| v.tier != Tier::Core) {
            return Err(AnovaError::InvalidParameter(format!(
                "'{}' is listed as core but tagged {}",
                v.column,
                v.tier.name()
            )));
        }
        if let Some(v) = supplementary.iter().find(|v| v.tier != Tier::Supplementary) {
            return Err(AnovaError::InvalidParameter(format!(
                "'{}' is listed as supplementary but tagged {}",
                v.column,
                v.tier.name()
            )));
        }
        Ok(Self {
            core,
            supplementary,
        })
    }

    /// Response variables of the forage seedline trial.
    pub fn forage_seedlines() -> Self {
        Self {
            core: vec![
                ResponseVariable::core("PLANT_COUNT"),
                ResponseVariable::core("SEED_WEIGHT_g"),
                ResponseVariable::core("Avg_seed_weight_per_plant"),
            ],
            supplementary: vec![
                ResponseVariable::supplementary("AVG_WETBM_QUAD", "Avg Wet Biomass per Quadrant"),
                ResponseVariable::supplementary("AVG_WETBM_PLANT", "Avg Wet Biomass per Plant"),
                ResponseVariable::supplementary("AVG_DRYBM_QUAD", "Avg Dry Biomass per Quadrant"),
                ResponseVariable::supplementary("AVG_DRYBM_PLANT", "Avg Dry Biomass per Plant"),
            ],
        }
    }

    /// Core variables in analysis order.
    pub fn core(&self) -> &[ResponseVariable] {
        &self.core
    }

    /// Supplementary variables in analysis order.
    pub fn supplementary(&self) -> &[ResponseVariable] {
        &self.supplementary
    }

    /// All variables: core first, then supplementary.
    pub fn iter(&self) -> impl Iterator<Item = &ResponseVariable> {
        self.core.iter().chain(self.supplementary.iter())
    }

    /// Check every variable names a numeric column of `schema`.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for var in self.iter() {
            if schema.numeric_index(&var.column).is_none() {
                return Err(AnovaError::MissingColumn(var.column.clone()));
            }
        }
        Ok(())
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::forage_seedlines()
    }
}
