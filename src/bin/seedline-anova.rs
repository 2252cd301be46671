//! seedline-anova - one-way ANOVA report for forage seedline trials
//!
//! Reads the trial sheet (CSV export), runs the analysis and prints the
//! report to stdout. Logs go to stderr.

use clap::Parser;
use seedline_anova::data::{normalize_sheet, RawSheet, Schema};
use seedline_anova::error::Result;
use seedline_anova::pipeline::Pipeline;
use seedline_anova::report::{write_report, ReportFormat};
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default input file name.
const DEFAULT_INPUT: &str = "Forage_seedlines_copy.csv";

/// One-way ANOVA analysis of forage seedline field trials
#[derive(Parser)]
#[command(name = "seedline-anova")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the trial sheet exported as CSV
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output format: text, json, or yaml
    #[arg(short, long, default_value = "text")]
    format: ReportFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // RUST_LOG wins unless -v was given.
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("seedline_anova={}", level)))
    } else {
        EnvFilter::new(format!("seedline_anova={}", level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    tracing::info!(path = %cli.input.display(), "loading sheet");
    let sheet = RawSheet::from_csv(&cli.input)?;
    let table = normalize_sheet(&sheet, &Schema::forage_seedlines())?;
    tracing::info!(
        rows = table.n_rows(),
        groups = table.group_ids().len(),
        "normalized sheet"
    );

    let report = Pipeline::default().run(&table)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&report, cli.format, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
