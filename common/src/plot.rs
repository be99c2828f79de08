use core::fmt::Debug;
use std::path::{Path, PathBuf};

use dyn_clone::{DynClone, clone_trait_object};
use eyre::Result;
use tracing::{debug, info};

use crate::{analysis::Report, config::PlotStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotOutcome {
    Written(PathBuf),
    /// Nothing to draw, no file was produced
    Skipped {
        name: &'static str,
        reason: String,
    },
}

#[typetag::serde(tag = "type")]
pub trait Plot: Debug + DynClone + Send + Sync {
    /// Name of the chart, for identification
    fn name(&self) -> &'static str;
    /// Image filename, relative to the output directory
    fn filename(&self) -> &str;
    /// Renders the chart
    ///
    /// Arguments:
    /// * `report` - Runs with derived speedups and the serial baseline
    /// * `plot_path` - Directory the image is written to
    /// * `style` - Canvas size and font
    fn plot(&self, report: &Report, plot_path: &Path, style: &PlotStyle) -> Result<PlotOutcome>;
}
clone_trait_object!(Plot);

pub fn plot(
    plots: &[Box<dyn Plot>],
    report: &Report,
    plot_path: &Path,
    style: &PlotStyle,
) -> Result<Vec<PlotOutcome>> {
    if plots.is_empty() {
        debug!("No plots");
        return Ok(Vec::new());
    }

    let mut outcomes = Vec::with_capacity(plots.len());
    for plot in plots {
        info!("Generating plot: {}", plot.name());
        let outcome = plot.plot(report, plot_path, style)?;
        match &outcome {
            PlotOutcome::Written(path) => debug!("Wrote {}", path.display()),
            PlotOutcome::Skipped { name, reason } => info!("Skipping {name}: {reason}"),
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
