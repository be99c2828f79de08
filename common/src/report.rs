use std::fs::create_dir_all;

use eyre::{Context, Result};
use tracing::info;

use crate::{
    analysis::Report,
    config::Config,
    plot::{Plot, PlotOutcome, plot},
    record::load_records,
};

/// Loads the results file and derives speedups, failing on a missing file or baseline
pub fn load_report(config: &Config) -> Result<Report> {
    let table = load_records(&config.input, &config.settings)?;
    info!(
        "Loaded '{}': {} runs kept, {} dropped",
        config.input.display(),
        table.len(),
        table.dropped
    );

    let report = Report::build(table, &config.settings)?;
    info!(
        "Baseline ({}) set at {:.1} ms",
        report.baseline.schedule, report.baseline.tempo_ms
    );
    Ok(report)
}

/// Full pipeline: load, derive, render every chart into the output directory
pub fn generate(config: &Config, plots: &[Box<dyn Plot>]) -> Result<Vec<PlotOutcome>> {
    let report = load_report(config)?;
    create_dir_all(&config.output_dir)
        .wrap_err_with(|| format!("Create output dir {}", config.output_dir.display()))?;
    plot(plots, &report, &config.output_dir, &config.style)
}
