//! Plain-text rendering of an analysis report.

use crate::error::Result;
use crate::model::AnovaTable;
use crate::pipeline::{Analysis, AnalysisReport, VariableReport};
use crate::profile::{DataOverview, GroupSummary};
use crate::test::{GroupNormality, LeveneResult, NormalityDiagnostic, TukeyHsd, ALPHA};
use std::io::Write;

const RULE_WIDTH: usize = 70;

fn banner(out: &mut impl Write, title: &str) -> Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    Ok(())
}

/// Write the full report to `out`.
pub fn write_text(report: &AnalysisReport, out: &mut impl Write) -> Result<()> {
    banner(out, "         ANOVA ANALYSIS — Forage Sorghum Seedlines")?;
    write_overview(&report.overview, out)?;

    writeln!(out)?;
    banner(
        out,
        &format!(
            "  ONE-WAY ANOVA: Testing differences among {} seedlines",
            report.overview.n_groups()
        ),
    )?;
    for variable in &report.core {
        write_variable(variable, out)?;
    }

    writeln!(out, "\n")?;
    banner(out, "  BIOMASS ANOVA (sparsely measured variables)")?;
    for variable in &report.supplementary {
        write_variable(variable, out)?;
    }

    writeln!(out)?;
    banner(out, "  ANALYSIS COMPLETE")?;
    Ok(())
}

/// Render the report to a string.
pub fn render_text(report: &AnalysisReport) -> Result<String> {
    let mut buf = Vec::new();
    write_text(report, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_overview(overview: &DataOverview, out: &mut impl Write) -> Result<()> {
    let ids: Vec<String> = overview.group_ids.iter().map(|id| format!("'{}'", id)).collect();
    writeln!(out, "\n── Cleaned Data Overview ──")?;
    writeln!(out, "Seedlines : [{}]", ids.join(", "))?;
    writeln!(
        out,
        "Total rows: {}  ({} seedlines)",
        overview.n_rows,
        overview.n_groups()
    )?;
    writeln!(out, "\nVariables available for analysis:")?;
    for column in &overview.columns {
        writeln!(
            out,
            "  {:30}  n={:3}  mean={:.2}",
            column.column, column.n, column.mean
        )?;
    }
    Ok(())
}

fn write_variable(report: &VariableReport, out: &mut impl Write) -> Result<()> {
    let core = report.normality.is_some();

    writeln!(out, "\n{}", "─".repeat(RULE_WIDTH))?;
    writeln!(out, "  Response Variable: {}", report.variable.heading())?;
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;

    writeln!(out, "\n  Group Summary:")?;
    write_group_summary(&report.summary, out)?;

    if let Some(normality) = &report.normality {
        write_normality(normality, out)?;
    }

    match &report.analysis {
        Analysis::Insufficient { .. } => {
            writeln!(
                out,
                "  Insufficient data for ANOVA (need ≥2 groups with ≥2 obs each)"
            )?;
        }
        Analysis::Completed {
            homogeneity,
            anova,
            decomposition,
            post_hoc,
        } => {
            if let Some(levene) = homogeneity {
                write_homogeneity(levene, core, out)?;
            }

            writeln!(out, "\n  *** One-Way ANOVA ***")?;
            if core {
                writeln!(out, "    F-statistic = {:.4}", anova.f_statistic)?;
                writeln!(out, "    p-value     = {:.6}", anova.p_value)?;
                if anova.significant {
                    writeln!(
                        out,
                        "    --> SIGNIFICANT at α={}: At least one seedline differs.",
                        ALPHA
                    )?;
                } else {
                    writeln!(
                        out,
                        "    --> NOT significant at α={}: No evidence of difference.",
                        ALPHA
                    )?;
                }
            } else {
                writeln!(
                    out,
                    "    F = {:.4},  p = {:.6}",
                    anova.f_statistic, anova.p_value
                )?;
                if anova.significant {
                    writeln!(out, "    --> SIGNIFICANT")?;
                } else {
                    writeln!(out, "    --> NOT significant")?;
                }
            }

            match decomposition {
                Some(Ok(table)) => write_anova_table(table, out)?,
                Some(Err(failure)) => {
                    writeln!(out, "  (Could not build ANOVA table: {})", failure)?
                }
                None => {}
            }

            if let Some(tukey) = post_hoc {
                writeln!(out, "\n  *** Tukey's HSD Post-Hoc Test ***")?;
                write_tukey(tukey, out)?;
            }
        }
    }
    Ok(())
}

fn write_group_summary(summary: &[GroupSummary], out: &mut impl Write) -> Result<()> {
    let name_width = summary
        .iter()
        .map(|s| s.group_id.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    writeln!(
        out,
        "{:name_width$}  {:>5}  {:>12}  {:>12}",
        "",
        "count",
        "mean",
        "std",
        name_width = name_width
    )?;
    writeln!(out, "{:name_width$}", "NAME", name_width = name_width)?;
    for s in summary {
        let std = match s.std_dev {
            Some(sd) => format!("{:.6}", sd),
            None => "NaN".to_string(),
        };
        writeln!(
            out,
            "{:name_width$}  {:>5}  {:>12.6}  {:>12}",
            s.group_id,
            s.count,
            s.mean,
            std,
            name_width = name_width
        )?;
    }
    Ok(())
}

fn write_normality(normality: &NormalityDiagnostic, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n  Shapiro-Wilk Normality Test (H0: data is normal):")?;
    for group in &normality.groups {
        match group {
            GroupNormality::Tested {
                group_id,
                statistic,
                p_value,
                verdict,
                ..
            } => writeln!(
                out,
                "    {:15}  W={:.4}  p={:.4}  ({})",
                group_id,
                statistic,
                p_value,
                verdict.name()
            )?,
            GroupNormality::InsufficientData { group_id, n } => writeln!(
                out,
                "    {:15}  Too few observations (n={})",
                group_id, n
            )?,
        }
    }
    if normality.n_tested() > 0 {
        let all = if normality.all_normal() { "yes" } else { "no" };
        writeln!(out, "    All tested groups normal: {}", all)?;
    }
    Ok(())
}

fn write_homogeneity(levene: &LeveneResult, core: bool, out: &mut impl Write) -> Result<()> {
    if core {
        writeln!(out, "\n  Levene's Test for Equal Variances:")?;
        writeln!(
            out,
            "    W={:.4}  p={:.4}  ({})",
            levene.statistic,
            levene.p_value,
            levene.verdict.name()
        )?;
    } else {
        let short = levene
            .verdict
            .name()
            .split_whitespace()
            .next()
            .unwrap_or_default();
        writeln!(
            out,
            "\n  Levene's Test: W={:.4}  p={:.4}  ({})",
            levene.statistic, levene.p_value, short
        )?;
    }
    Ok(())
}

fn write_anova_table(table: &AnovaTable, out: &mut impl Write) -> Result<()> {
    let source_width = table
        .rows()
        .iter()
        .map(|r| r.source.chars().count())
        .max()
        .unwrap_or(0);

    writeln!(out, "\n  ANOVA Table:")?;
    writeln!(
        out,
        "{:source_width$}  {:>14}  {:>5}  {:>12}  {:>12}",
        "",
        "sum_sq",
        "df",
        "F",
        "PR(>F)",
        source_width = source_width
    )?;
    for row in table.rows() {
        let f = row
            .f_statistic
            .map_or_else(|| "NaN".to_string(), |v| format!("{:.6}", v));
        let p = row
            .p_value
            .map_or_else(|| "NaN".to_string(), |v| format!("{:.6e}", v));
        writeln!(
            out,
            "{:source_width$}  {:>14.6}  {:>5.1}  {:>12}  {:>12}",
            row.source,
            row.sum_sq,
            row.df as f64,
            f,
            p,
            source_width = source_width
        )?;
    }
    Ok(())
}

fn write_tukey(tukey: &TukeyHsd, out: &mut impl Write) -> Result<()> {
    let headers = ["group1", "group2", "meandiff", "p-adj", "lower", "upper", "reject"];
    let rows: Vec<[String; 7]> = tukey
        .comparisons
        .iter()
        .map(|c| {
            [
                c.group1.clone(),
                c.group2.clone(),
                format!("{:.4}", c.mean_diff),
                format!("{:.4}", c.p_adj),
                format!("{:.4}", c.lower),
                format!("{:.4}", c.upper),
                if c.reject { "True" } else { "False" }.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let total = widths.iter().sum::<usize>() + widths.len() - 1;

    writeln!(
        out,
        "Multiple Comparison of Means - Tukey HSD, FWER={:.2}",
        tukey.alpha
    )?;
    writeln!(out, "{}", "=".repeat(total))?;
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:>w$}", h, w = *w))
        .collect();
    writeln!(out, "{}", header_line.join(" "))?;
    writeln!(out, "{}", "-".repeat(total))?;
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:>w$}", cell, w = *w))
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    writeln!(out, "{}", "-".repeat(total))?;
    Ok(())
}
