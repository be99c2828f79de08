use std::path::Path;

use common::{
    analysis::Report,
    config::PlotStyle,
    plot::{Plot, PlotOutcome},
};
use eyre::Result;
use plot_common::{BarChart, BarSeriesSpec, ReferenceLine, render_bar_chart};
use plotters::style::RED;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CHUNK_IMPACT_FILE: &str = "grafico_chunk_size_comparativo.png";

/// Duration per chunk size at the highest thread count, against the serial run
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkImpact {
    #[serde(default)]
    filename: Option<String>,
}

/// `None` when no run at the highest thread count has an explicit chunk size
pub fn chunk_chart(report: &Report) -> Option<BarChart> {
    let groups = report.chunk_groups();
    let max_threads = report.max_threads()?;
    if groups.is_empty() {
        return None;
    }

    let schedules = report
        .schedules()
        .into_iter()
        .filter(|schedule| {
            groups
                .iter()
                .any(|g| g.bars.iter().any(|(s, _)| s == schedule))
        })
        .collect::<Vec<_>>();
    let series = schedules
        .into_iter()
        .map(|schedule| BarSeriesSpec {
            values: groups
                .iter()
                .map(|g| g.bars.iter().find(|(s, _)| *s == schedule).map(|b| b.1))
                .collect(),
            label: schedule,
        })
        .collect();

    let baseline = &report.baseline;
    Some(BarChart {
        title: format!(
            "Chunk size impact ({max_threads} threads) vs. {}",
            baseline.schedule
        ),
        x_desc: "Chunk size".to_owned(),
        y_desc: "Execution time (ms)".to_owned(),
        categories: groups.iter().map(|g| g.chunk.to_string()).collect(),
        series,
        reference: Some(ReferenceLine {
            label: format!("{} run ({:.1} ms)", baseline.schedule, baseline.tempo_ms),
            y: baseline.tempo_ms,
            color: RED,
        }),
    })
}

#[typetag::serde]
impl Plot for ChunkImpact {
    fn name(&self) -> &'static str {
        "chunk-impact"
    }

    fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(CHUNK_IMPACT_FILE)
    }

    fn plot(&self, report: &Report, plot_path: &Path, style: &PlotStyle) -> Result<PlotOutcome> {
        let Some(chart) = chunk_chart(report) else {
            return Ok(PlotOutcome::Skipped {
                name: self.name(),
                reason: "no runs with an explicit chunk size at the highest thread count"
                    .to_owned(),
            });
        };
        debug!(
            "{} chunk sizes, {} schedules",
            chart.categories.len(),
            chart.series.len()
        );
        let filepath = plot_path.join(self.filename());
        render_bar_chart(&filepath, style, &chart)?;
        Ok(PlotOutcome::Written(filepath))
    }
}
