//! Pipeline runner: drives every response variable through the analysis steps.

use crate::data::{
    group_values, GroupSample, GroupedValues, ResponseVariable, Tier, TidyTable, VariableCatalog,
    GROUP_COLUMN, MIN_GROUP_SIZE,
};
use crate::error::{AnovaError, Result};
use crate::model::{anova_table, AnovaTable, DecompositionFailure};
use crate::profile::{profile_groups, profile_overview, DataOverview, GroupSummary};
use crate::test::{
    diagnose_normality, is_significant, test_anova_oneway, test_levene, test_tukey_hsd,
    AnovaResult, LeveneResult, NormalityDiagnostic, TukeyHsd, ALPHA,
};
use serde::{Deserialize, Serialize};

/// A step in the per-variable analysis sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStep {
    /// Count, mean and standard deviation per group.
    Summarize,
    /// Shapiro-Wilk per group with at least three values.
    CheckNormality,
    /// Levene (median-centred) across groups with at least two values.
    CheckHomogeneity,
    /// One-way ANOVA across groups with at least two values.
    TestOmnibus,
    /// Type II table from a linear model fit.
    Decompose,
    /// Tukey HSD over every group with a value, only after a significant omnibus test.
    TestPostHoc,
}

impl PipelineStep {
    /// Steps run for core variables.
    pub fn core_sequence() -> Vec<Self> {
        vec![
            Self::Summarize,
            Self::CheckNormality,
            Self::CheckHomogeneity,
            Self::TestOmnibus,
            Self::Decompose,
            Self::TestPostHoc,
        ]
    }

    /// Steps run for supplementary variables (no normality, no decomposition).
    pub fn supplementary_sequence() -> Vec<Self> {
        vec![
            Self::Summarize,
            Self::CheckHomogeneity,
            Self::TestOmnibus,
            Self::TestPostHoc,
        ]
    }

    /// Default sequence for a tier.
    pub fn sequence_for(tier: Tier) -> Vec<Self> {
        match tier {
            Tier::Core => Self::core_sequence(),
            Tier::Supplementary => Self::supplementary_sequence(),
        }
    }
}

/// Outcome of the decomposition step: the table or the reason it could not be built.
pub type Decomposition = std::result::Result<AnovaTable, DecompositionFailure>;

/// Tests run on a variable with at least two eligible groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Analysis {
    /// The omnibus test ran.
    Completed {
        /// Homogeneity-of-variance diagnostic.
        homogeneity: Option<LeveneResult>,
        /// One-way ANOVA.
        anova: AnovaResult,
        /// Type II table; core variables only.
        decomposition: Option<Decomposition>,
        /// Tukey HSD; present only when the ANOVA was significant.
        post_hoc: Option<TukeyHsd>,
    },
    /// Fewer than two groups with at least two values.
    Insufficient {
        /// Number of groups that met the size requirement.
        eligible_groups: usize,
    },
}

impl Analysis {
    /// The omnibus result, if it ran.
    pub fn anova(&self) -> Option<&AnovaResult> {
        match self {
            Self::Completed { anova, .. } => Some(anova),
            Self::Insufficient { .. } => None,
        }
    }

    /// The post-hoc result, if it ran.
    pub fn post_hoc(&self) -> Option<&TukeyHsd> {
        match self {
            Self::Completed { post_hoc, .. } => post_hoc.as_ref(),
            Self::Insufficient { .. } => None,
        }
    }

    /// The decomposition outcome, if attempted.
    pub fn decomposition(&self) -> Option<&Decomposition> {
        match self {
            Self::Completed { decomposition, .. } => decomposition.as_ref(),
            Self::Insufficient { .. } => None,
        }
    }

    /// The homogeneity result, if it ran.
    pub fn homogeneity(&self) -> Option<&LeveneResult> {
        match self {
            Self::Completed { homogeneity, .. } => homogeneity.as_ref(),
            Self::Insufficient { .. } => None,
        }
    }
}

/// Results for one response variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableReport {
    /// The variable analyzed.
    pub variable: ResponseVariable,
    /// Per-group summary, alphabetical by group.
    pub summary: Vec<GroupSummary>,
    /// Per-group normality; core variables only.
    pub normality: Option<NormalityDiagnostic>,
    /// Omnibus and follow-up tests.
    pub analysis: Analysis,
}

impl VariableReport {
    /// Whether the omnibus test found a difference.
    pub fn is_significant(&self) -> bool {
        self.analysis.anova().is_some_and(|a| a.significant)
    }
}

/// Full output of a run: overview, then core and supplementary variables in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Cleaned-data overview.
    pub overview: DataOverview,
    /// Core variable reports (empty variables are left out).
    pub core: Vec<VariableReport>,
    /// Supplementary variable reports (empty and constant variables are left out).
    pub supplementary: Vec<VariableReport>,
}

impl AnalysisReport {
    /// Look up a variable's report by column name.
    pub fn variable(&self, column: &str) -> Option<&VariableReport> {
        self.core
            .iter()
            .chain(self.supplementary.iter())
            .find(|r| r.variable.column == column)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(AnovaError::from)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(AnovaError::from)
    }
}

/// Runs the catalog's variables through their step sequences.
#[derive(Debug, Clone)]
pub struct Pipeline {
    catalog: VariableCatalog,
    core_steps: Vec<PipelineStep>,
    supplementary_steps: Vec<PipelineStep>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(VariableCatalog::forage_seedlines())
    }
}

impl Pipeline {
    /// Create a pipeline over `catalog` with the default step sequences.
    pub fn new(catalog: VariableCatalog) -> Self {
        Self {
            catalog,
            core_steps: PipelineStep::core_sequence(),
            supplementary_steps: PipelineStep::supplementary_sequence(),
        }
    }

    /// The variable catalog.
    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Steps for a tier.
    pub fn steps(&self, tier: Tier) -> &[PipelineStep] {
        match tier {
            Tier::Core => &self.core_steps,
            Tier::Supplementary => &self.supplementary_steps,
        }
    }

    /// Run the pipeline on a tidy table.
    pub fn run(&self, table: &TidyTable) -> Result<AnalysisReport> {
        self.catalog.validate(table.schema())?;

        let overview = profile_overview(table);
        tracing::debug!(
            rows = overview.n_rows,
            groups = overview.n_groups(),
            "profiled cleaned table"
        );

        let mut core = Vec::new();
        for variable in self.catalog.core() {
            if let Some(report) = self.run_variable(table, variable)? {
                core.push(report);
            }
        }

        let mut supplementary = Vec::new();
        for variable in self.catalog.supplementary() {
            if let Some(report) = self.run_variable(table, variable)? {
                supplementary.push(report);
            }
        }

        Ok(AnalysisReport {
            overview,
            core,
            supplementary,
        })
    }

    fn run_variable(
        &self,
        table: &TidyTable,
        variable: &ResponseVariable,
    ) -> Result<Option<VariableReport>> {
        let grouped = group_values(table, &variable.column)?;

        if grouped.is_empty() {
            tracing::warn!(variable = %variable.column, "no values, variable skipped");
            return Ok(None);
        }
        if variable.tier == Tier::Supplementary && grouped.n_distinct() < 2 {
            tracing::warn!(variable = %variable.column, "constant values, variable skipped");
            return Ok(None);
        }

        let mut state = VariableState::new(grouped);
        for step in self.steps(variable.tier) {
            state = state.apply(*step).map_err(|e| {
                AnovaError::Pipeline(format!(
                    "{} step {:?} failed: {}",
                    variable.column, step, e
                ))
            })?;
        }

        Ok(Some(state.finalize(variable.clone())))
    }
}

/// Run the default forage seedline analysis.
pub fn run_analysis(table: &TidyTable) -> Result<AnalysisReport> {
    Pipeline::default().run(table)
}

/// Intermediate results for one variable.
struct VariableState {
    grouped: GroupedValues,
    summary: Vec<GroupSummary>,
    normality: Option<NormalityDiagnostic>,
    homogeneity: Option<LeveneResult>,
    anova: Option<AnovaResult>,
    decomposition: Option<Decomposition>,
    post_hoc: Option<TukeyHsd>,
}

impl VariableState {
    fn new(grouped: GroupedValues) -> Self {
        Self {
            grouped,
            summary: Vec::new(),
            normality: None,
            homogeneity: None,
            anova: None,
            decomposition: None,
            post_hoc: None,
        }
    }

    fn eligible(&self) -> Vec<&GroupSample> {
        self.grouped.eligible(MIN_GROUP_SIZE)
    }

    fn apply(mut self, step: PipelineStep) -> Result<Self> {
        let column = self.grouped.column.as_str();
        match step {
            PipelineStep::Summarize => {
                self.summary = profile_groups(&self.grouped);
            }
            PipelineStep::CheckNormality => {
                self.normality = Some(diagnose_normality(&self.grouped));
            }
            PipelineStep::CheckHomogeneity => {
                let eligible = self.eligible();
                if eligible.len() >= 2 {
                    let slices: Vec<&[f64]> = eligible.iter().map(|g| g.values.as_slice()).collect();
                    match test_levene(&slices) {
                        Ok(result) => self.homogeneity = Some(result),
                        Err(e) => {
                            tracing::warn!(variable = %column, error = %e, "homogeneity test skipped")
                        }
                    }
                }
            }
            PipelineStep::TestOmnibus => {
                let eligible = self.eligible();
                if eligible.len() < 2 {
                    tracing::warn!(
                        variable = %column,
                        eligible = eligible.len(),
                        "insufficient data for ANOVA"
                    );
                } else {
                    let slices: Vec<&[f64]> = eligible.iter().map(|g| g.values.as_slice()).collect();
                    let result = test_anova_oneway(&slices)?;
                    tracing::debug!(
                        variable = %column,
                        f = result.f_statistic,
                        p = result.p_value,
                        "omnibus test"
                    );
                    self.anova = Some(result);
                }
            }
            PipelineStep::Decompose => {
                if self.anova.is_some() {
                    let outcome = anova_table(&self.eligible(), GROUP_COLUMN);
                    if let Err(failure) = &outcome {
                        tracing::warn!(variable = %column, reason = %failure, "no decomposition table");
                    }
                    self.decomposition = Some(outcome);
                }
            }
            PipelineStep::TestPostHoc => {
                let significant = self
                    .anova
                    .as_ref()
                    .is_some_and(|a| is_significant(a.p_value));
                if significant {
                    let groups: Vec<&GroupSample> = self.grouped.groups.iter().collect();
                    match test_tukey_hsd(&groups, ALPHA) {
                        Ok(result) => {
                            tracing::debug!(
                                variable = %column,
                                rejected = result.n_rejected(),
                                "post-hoc test"
                            );
                            self.post_hoc = Some(result);
                        }
                        Err(e) => {
                            tracing::warn!(variable = %column, error = %e, "post-hoc test skipped")
                        }
                    }
                }
            }
        }
        Ok(self)
    }

    fn finalize(self, variable: ResponseVariable) -> VariableReport {
        let analysis = match self.anova {
            Some(anova) => Analysis::Completed {
                homogeneity: self.homogeneity,
                anova,
                decomposition: self.decomposition,
                post_hoc: self.post_hoc,
            },
            None => Analysis::Insufficient {
                eligible_groups: self.grouped.eligible(MIN_GROUP_SIZE).len(),
            },
        };
        VariableReport {
            variable,
            summary: self.summary,
            normality: self.normality,
            analysis,
        }
    }
}
