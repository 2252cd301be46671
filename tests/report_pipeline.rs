//! Integration tests for the full sheet-to-report pipeline.

use approx::assert_relative_eq;
use seedline_anova::prelude::*;
use seedline_anova::test::GroupNormality;
use std::io::Write;
use tempfile::NamedTempFile;

const SEEDLINES: [&str; 8] = [
    "Atlas", "Bonanza", "Cadence", "Dynamo", "Everest", "Frontier", "Garrison", "Horizon",
];

/// Within-group offsets, rotated per group so every group has the same spread.
const OFFSETS: [f64; 5] = [-0.2, -0.1, 0.0, 0.1, 0.2];

struct TrialLayout {
    seed_means: [f64; 8],
    /// Replications (1-based) with plant count missing in the last seedline.
    missing_plant_counts: Vec<usize>,
}

impl TrialLayout {
    fn separated() -> Self {
        Self {
            seed_means: [10.0, 12.0, 30.0, 31.0, 9.0, 11.0, 29.0, 32.0],
            missing_plant_counts: Vec::new(),
        }
    }

    fn equal() -> Self {
        Self {
            seed_means: [20.0; 8],
            missing_plant_counts: Vec::new(),
        }
    }

    /// Sheet as CSV text: two title rows, then 8 seedlines × 5 replications with
    /// the seedline name only on the first row of each block.
    fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("Forage sorghum seedline trial,,,,,,,,,,,,,,,\n");
        csv.push_str(
            "Name,Rep,Plants,Seed wt (g),Seed wt/plant,Total seed,Wet Q1,Wet Q2,Dry Q1,Dry Q2,\
             Avg wet/quad,Avg wet/plant,Avg dry/quad,Avg dry/plant,Harvested Q1,Harvested Q2\n",
        );

        for (g, name) in SEEDLINES.iter().enumerate() {
            for rep in 1..=5usize {
                let offset = OFFSETS[(rep + g) % 5];
                let seed = self.seed_means[g] + offset;
                let plants_missing = g == 7 && self.missing_plant_counts.contains(&rep);
                let plants = 20.0 + offset * 10.0;
                let biomass_rep = rep == 2 || rep == 4;

                let mut cells: Vec<String> = Vec::with_capacity(16);
                cells.push(if rep == 1 { name.to_string() } else { String::new() });
                cells.push(rep.to_string());
                cells.push(if plants_missing { "n/a".to_string() } else { format!("{}", plants) });
                cells.push(format!("{}", seed));
                cells.push(if plants_missing {
                    String::new()
                } else {
                    format!("{:.4}", seed / plants)
                });
                cells.push(String::new());
                for _ in 0..4 {
                    cells.push(if biomass_rep { "1.0".to_string() } else { String::new() });
                }
                // AVG_WETBM_QUAD: reps 2 and 4 only, clearly separated by seedline.
                cells.push(if biomass_rep {
                    let shift = if rep == 2 { 1.0 } else { -1.5 };
                    format!("{}", 100.0 + 10.0 * g as f64 + shift)
                } else {
                    String::new()
                });
                // AVG_WETBM_PLANT: never measured.
                cells.push(String::new());
                // AVG_DRYBM_QUAD: constant.
                cells.push(if biomass_rep { "5".to_string() } else { String::new() });
                // AVG_DRYBM_PLANT: reps 2 and 4, no seedline effect.
                cells.push(if biomass_rep {
                    format!("{}", if rep == 2 { 2.0 } else { 3.0 })
                } else {
                    String::new()
                });
                cells.push(String::new());
                cells.push(String::new());

                csv.push_str(&cells.join(","));
                csv.push('\n');
            }
        }
        csv
    }
}

/// Sheet with only plant count and seed weight filled in; `None` leaves the cell blank.
fn sparse_sheet(rows: &[(&str, Option<f64>, Option<f64>)]) -> TidyTable {
    let mut csv = String::from("Trial,,,,,,,,,,,,,,,\nName,Rep,Plants,Seed wt (g),,,,,,,,,,,,\n");
    let mut previous = "";
    for (rep, (name, plants, seed)) in rows.iter().enumerate() {
        let cell = |v: &Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        let label = if *name == previous { "" } else { *name };
        previous = *name;
        csv.push_str(&format!(
            "{},{},{},{}{}\n",
            label,
            rep + 1,
            cell(plants),
            cell(seed),
            ",".repeat(12)
        ));
    }
    let sheet = RawSheet::from_reader(csv.as_bytes()).unwrap();
    normalize_sheet(&sheet, &Schema::forage_seedlines()).unwrap()
}

fn write_sheet(csv: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(csv.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load(layout: &TrialLayout) -> TidyTable {
    let file = write_sheet(&layout.to_csv());
    let sheet = RawSheet::from_csv(file.path()).unwrap();
    normalize_sheet(&sheet, &Schema::forage_seedlines()).unwrap()
}

fn render(report: &AnalysisReport) -> String {
    let mut buf: Vec<u8> = Vec::new();
    write_text(report, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_normalizer_fills_every_row() {
    let table = load(&TrialLayout::separated());

    assert_eq!(table.n_rows(), 40);
    assert_eq!(table.group_ids(), SEEDLINES.to_vec());
    assert!(table.observations().iter().all(|o| !o.group_id.is_empty()));

    let rows_per_group = |id: &str| {
        table
            .observations()
            .iter()
            .filter(|o| o.group_id == id)
            .count()
    };
    assert!(SEEDLINES.iter().all(|id| rows_per_group(id) == 5));
}

#[test]
fn test_separated_means_are_significant() {
    let table = load(&TrialLayout::separated());
    let report = run_analysis(&table).unwrap();

    let seed = report.variable("SEED_WEIGHT_g").unwrap();
    let anova = seed.analysis.anova().unwrap();
    assert!(anova.p_value < 0.05);
    assert_eq!(anova.df_between, 7);
    assert_eq!(anova.df_within, 32);

    let post_hoc = seed.analysis.post_hoc().unwrap();
    assert_eq!(post_hoc.comparisons.len(), 28);
    assert!(post_hoc.n_rejected() >= 1);
    let far = post_hoc.get_pair("Atlas", "Cadence").unwrap();
    assert!(far.reject);
    assert_relative_eq!(far.mean_diff, 20.0, epsilon = 1e-9);
    let near = post_hoc.get_pair("Cadence", "Dynamo").unwrap();
    assert!(near.reject);

    // Both ANOVA views describe the same test.
    let table = match seed.analysis.decomposition() {
        Some(Ok(table)) => table,
        other => panic!("expected a decomposition table, got {:?}", other),
    };
    assert_eq!(table.factor().source, "C(NAME)");
    assert_relative_eq!(
        table.factor().f_statistic.unwrap(),
        anova.f_statistic,
        max_relative = 1e-8
    );
    assert_eq!(table.residual().df, anova.df_within);

    let text = render(&report);
    assert!(text.contains("Response Variable: SEED_WEIGHT_g"));
    assert!(text.contains("--> SIGNIFICANT at α=0.05"));
    assert!(text.contains("*** Tukey's HSD Post-Hoc Test ***"));
}

#[test]
fn test_equal_means_skip_post_hoc() {
    let table = load(&TrialLayout::equal());
    let report = run_analysis(&table).unwrap();

    let seed = report.variable("SEED_WEIGHT_g").unwrap();
    let anova = seed.analysis.anova().unwrap();
    assert!(anova.p_value >= 0.05);
    assert!(!seed.is_significant());
    assert!(seed.analysis.post_hoc().is_none());

    let text = render(&report);
    let section = text
        .split("Response Variable: SEED_WEIGHT_g")
        .nth(1)
        .and_then(|rest| rest.split("Response Variable:").next())
        .unwrap();
    assert!(section.contains("--> NOT significant"));
    assert!(!section.contains("Tukey"));
}

#[test]
fn test_post_hoc_follows_omnibus_threshold() {
    for layout in [TrialLayout::separated(), TrialLayout::equal()] {
        let report = run_analysis(&load(&layout)).unwrap();
        for variable in report.core.iter().chain(report.supplementary.iter()) {
            if let Some(anova) = variable.analysis.anova() {
                assert_eq!(
                    variable.analysis.post_hoc().is_some(),
                    anova.p_value < 0.05,
                    "{}",
                    variable.variable.column
                );
            }
        }
    }
}

#[test]
fn test_sparse_supplementary_variable() {
    let report = run_analysis(&load(&TrialLayout::separated())).unwrap();

    let wet = report.variable("AVG_WETBM_QUAD").unwrap();
    assert_eq!(wet.variable.tier, Tier::Supplementary);
    assert_eq!(wet.summary.len(), 8);
    assert!(wet.summary.iter().all(|s| s.count == 2));
    assert!(wet.normality.is_none());
    assert!(wet.analysis.homogeneity().is_some());
    assert!(wet.analysis.decomposition().is_none());

    let anova = wet.analysis.anova().unwrap();
    assert_eq!(anova.df_between, 7);
    assert_eq!(anova.df_within, 8);
    assert!(anova.significant);

    let text = render(&report);
    assert!(text.contains("Response Variable: Avg Wet Biomass per Quadrant (AVG_WETBM_QUAD)"));
}

#[test]
fn test_empty_and_constant_supplementary_variables_are_omitted() {
    let report = run_analysis(&load(&TrialLayout::separated())).unwrap();

    assert!(report.variable("AVG_WETBM_PLANT").is_none());
    assert!(report.variable("AVG_DRYBM_QUAD").is_none());
    let columns: Vec<&str> = report
        .supplementary
        .iter()
        .map(|r| r.variable.column.as_str())
        .collect();
    assert_eq!(columns, vec!["AVG_WETBM_QUAD", "AVG_DRYBM_PLANT"]);

    let text = render(&report);
    assert!(!text.contains("Avg Wet Biomass per Plant"));
    assert!(!text.contains("Response Variable: Avg Dry Biomass per Quadrant"));
    // The constant column still shows up in the overview.
    assert!(text.contains("AVG_DRYBM_QUAD"));
}

#[test]
fn test_small_groups_report_insufficient_normality_data() {
    let layout = TrialLayout {
        missing_plant_counts: vec![1, 2, 3],
        ..TrialLayout::separated()
    };
    let report = run_analysis(&load(&layout)).unwrap();

    let plants = report.variable("PLANT_COUNT").unwrap();
    let horizon = plants.summary.iter().find(|s| s.group_id == "Horizon").unwrap();
    assert_eq!(horizon.count, 2);

    let normality = plants.normality.as_ref().unwrap();
    let entry = normality
        .groups
        .iter()
        .find(|g| g.group_id() == "Horizon")
        .unwrap();
    assert_eq!(
        entry,
        &GroupNormality::InsufficientData {
            group_id: "Horizon".to_string(),
            n: 2
        }
    );
    assert!(entry.verdict().is_none());
    assert_eq!(normality.n_tested(), 7);

    let text = render(&report);
    assert!(text.contains("Too few observations (n=2)"));
}

#[test]
fn test_post_hoc_keeps_single_value_seedline() {
    let table = sparse_sheet(&[
        ("Atlas", Some(20.0), Some(1.0)),
        ("Atlas", Some(21.0), Some(1.2)),
        ("Atlas", Some(19.0), Some(0.9)),
        ("Bonanza", Some(22.0), Some(9.0)),
        ("Bonanza", Some(20.0), Some(9.3)),
        ("Bonanza", Some(21.0), Some(8.8)),
        ("Cadence", Some(20.0), Some(20.0)),
        ("Cadence", Some(22.0), None),
        ("Cadence", Some(21.0), None),
    ]);
    let report = run_analysis(&table).unwrap();
    let seed = report.variable("SEED_WEIGHT_g").unwrap();

    let cadence = seed.summary.iter().find(|s| s.group_id == "Cadence").unwrap();
    assert_eq!(cadence.count, 1);
    assert!(cadence.std_dev.is_none());

    // Omnibus and decomposition only see the two groups with repeated values.
    let anova = seed.analysis.anova().unwrap();
    assert_eq!(anova.df_between, 1);
    assert_eq!(anova.df_within, 4);
    match seed.analysis.decomposition() {
        Some(Ok(table)) => assert_eq!(table.factor().df, 1),
        other => panic!("expected a decomposition table, got {:?}", other),
    }

    let post_hoc = seed.analysis.post_hoc().unwrap();
    assert_eq!(post_hoc.n_groups, 3);
    assert_eq!(post_hoc.comparisons.len(), 3);
    let far = post_hoc.get_pair("Atlas", "Cadence").unwrap();
    assert_relative_eq!(far.mean_diff, 20.0 - 31.0 / 30.0, epsilon = 1e-9);
    assert!(far.reject);
    assert!(post_hoc.get_pair("Bonanza", "Cadence").is_some());

    let text = render(&report);
    let tukey = text
        .split("Response Variable: SEED_WEIGHT_g")
        .nth(1)
        .and_then(|rest| rest.split("*** Tukey's HSD Post-Hoc Test ***").nth(1))
        .unwrap();
    assert!(tukey.contains("Cadence"));
}

#[test]
fn test_zero_residual_core_variable_keeps_post_hoc() {
    let table = sparse_sheet(&[
        ("Atlas", Some(20.0), Some(1.0)),
        ("Atlas", Some(20.0), Some(1.2)),
        ("Atlas", Some(20.0), Some(0.9)),
        ("Bonanza", Some(25.0), Some(1.1)),
        ("Bonanza", Some(25.0), Some(0.8)),
        ("Bonanza", Some(25.0), Some(1.0)),
    ]);
    let report = run_analysis(&table).unwrap();
    let plants = report.variable("PLANT_COUNT").unwrap();

    let anova = plants.analysis.anova().unwrap();
    assert!(anova.f_statistic.is_infinite());
    assert_eq!(anova.p_value, 0.0);
    assert!(plants.is_significant());
    assert_eq!(
        plants.analysis.decomposition(),
        Some(&Err(DecompositionFailure::ZeroResidual))
    );

    let post_hoc = plants.analysis.post_hoc().unwrap();
    let pair = post_hoc.get_pair("Atlas", "Bonanza").unwrap();
    assert_relative_eq!(pair.mean_diff, 5.0);
    assert_eq!(pair.p_adj, 0.0);
    assert!(pair.reject);

    let text = render(&report);
    let section = text
        .split("Response Variable: PLANT_COUNT")
        .nth(1)
        .and_then(|rest| rest.split("Response Variable:").next())
        .unwrap();
    assert!(section.contains("(Could not build ANOVA table: residual sum of squares is zero)"));
    assert!(section.contains("*** Tukey's HSD Post-Hoc Test ***"));
}

#[test]
fn test_report_is_deterministic() {
    let table = load(&TrialLayout::separated());
    let first = render(&run_analysis(&table).unwrap());
    let second = render(&run_analysis(&table).unwrap());
    assert_eq!(first, second);
    assert!(first.trim_end().ends_with(&"=".repeat(70)));
}

#[test]
fn test_structured_formats() {
    let report = run_analysis(&load(&TrialLayout::separated())).unwrap();

    let mut json = Vec::new();
    write_report(&report, ReportFormat::Json, &mut json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["core"].as_array().unwrap().len(), 3);
    assert_eq!(value["overview"]["n_rows"], 40);

    let mut yaml = Vec::new();
    write_report(&report, ReportFormat::Yaml, &mut yaml).unwrap();
    assert!(String::from_utf8(yaml).unwrap().contains("SEED_WEIGHT_g"));
}

#[test]
fn test_missing_file_is_fatal() {
    let result = RawSheet::from_csv("does/not/exist/Forage_seedlines_copy.csv");
    assert!(matches!(result, Err(AnovaError::Io(_))));
}

#[test]
fn test_narrow_sheet_is_schema_mismatch() {
    let csv = "title\nheader\nAtlas,1,20\n,2,21\n";
    let sheet = RawSheet::from_reader(csv.as_bytes()).unwrap();
    let result = normalize_sheet(&sheet, &Schema::forage_seedlines());
    assert!(matches!(
        result,
        Err(AnovaError::SchemaMismatch {
            expected: 16,
            actual: 3
        })
    ));
}
