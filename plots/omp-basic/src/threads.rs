use std::path::Path;

use common::{
    analysis::{Metric, Report, Series},
    config::PlotStyle,
    plot::{Plot, PlotOutcome},
};
use eyre::Result;
use plot_common::{
    LineSeriesSpec, Marker, MarkerShape, ReferenceLine, ThreadChart, render_thread_chart,
};
use plotters::style::{BLUE, RED};
use serde::{Deserialize, Serialize};

pub const THREAD_TIME_FILE: &str = "grafico_tempo_execucao_comparativo.png";
pub const SPEEDUP_FILE: &str = "grafico_speedup_vs_naive.png";

/// Execution time against thread count, one line per schedule
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadTime {
    #[serde(default)]
    filename: Option<String>,
}

/// Speedup over the serial baseline against thread count
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadSpeedup {
    #[serde(default)]
    filename: Option<String>,
}

fn line_series(series: Vec<Series>) -> Vec<LineSeriesSpec> {
    series
        .into_iter()
        .map(|s| LineSeriesSpec {
            label: s.schedule,
            points: s.points,
        })
        .collect()
}

pub fn time_chart(report: &Report) -> ThreadChart {
    let baseline_ms = report.baseline.tempo_ms;
    let mut markers = vec![Marker {
        label: format!("{} ({baseline_ms:.1} ms)", report.baseline.schedule),
        x: 1,
        y: baseline_ms,
        shape: MarkerShape::Triangle,
        color: RED,
    }];
    if let Some(fastest) = report.fastest_single_thread() {
        markers.push(Marker {
            label: format!(
                "{} 1-thread ({:.1} ms)",
                fastest.record.schedule, fastest.record.tempo_ms
            ),
            x: 1,
            y: fastest.record.tempo_ms,
            shape: MarkerShape::Ring,
            color: BLUE,
        });
    }

    ThreadChart {
        title: format!("Execution time: {} vs. parallel", report.baseline.schedule),
        x_desc: "Threads".to_owned(),
        y_desc: "Execution time (ms)".to_owned(),
        ticks: report.thread_counts(),
        series: line_series(report.thread_series(Metric::TempoMs)),
        markers,
        reference: None,
    }
}

pub fn speedup_chart(report: &Report) -> ThreadChart {
    let baseline = &report.baseline.schedule;
    ThreadChart {
        title: format!("Speedup over the {baseline} run"),
        x_desc: "Threads".to_owned(),
        y_desc: format!("Speedup ({baseline} time / parallel time)"),
        ticks: report.thread_counts(),
        series: line_series(report.thread_series(Metric::Speedup)),
        markers: Vec::new(),
        reference: Some(ReferenceLine {
            label: format!("Break-even (vs. {baseline})"),
            y: report.baseline_speedup(),
            color: RED,
        }),
    }
}

#[typetag::serde]
impl Plot for ThreadTime {
    fn name(&self) -> &'static str {
        "thread-time"
    }

    fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(THREAD_TIME_FILE)
    }

    fn plot(&self, report: &Report, plot_path: &Path, style: &PlotStyle) -> Result<PlotOutcome> {
        let filepath = plot_path.join(self.filename());
        render_thread_chart(&filepath, style, &time_chart(report))?;
        Ok(PlotOutcome::Written(filepath))
    }
}

#[typetag::serde]
impl Plot for ThreadSpeedup {
    fn name(&self) -> &'static str {
        "thread-speedup"
    }

    fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(SPEEDUP_FILE)
    }

    fn plot(&self, report: &Report, plot_path: &Path, style: &PlotStyle) -> Result<PlotOutcome> {
        let filepath = plot_path.join(self.filename());
        render_thread_chart(&filepath, style, &speedup_chart(report))?;
        Ok(PlotOutcome::Written(filepath))
    }
}

#[cfg(test)]
mod tests {
    use common::{
        config::Settings,
        record::{Chunk, Record, ResultTable},
    };

    use super::*;

    fn report(records: Vec<(&str, u32, Chunk, f64)>) -> Report {
        let records = records
            .into_iter()
            .map(|(schedule, threads, chunk, tempo_ms)| Record {
                schedule: schedule.to_owned(),
                threads: Some(threads),
                chunk,
                tempo_ms,
            })
            .collect();
        Report::build(
            ResultTable {
                records,
                dropped: 0,
            },
            &Settings::default(),
        )
        .unwrap()
    }

    #[test]
    fn time_chart_marks_baseline_and_fastest_single_thread() {
        let report = report(vec![
            ("Serial", 1, Chunk::Other("-".into()), 1000.0),
            ("static", 1, Chunk::Default, 1040.0),
            ("dynamic", 1, Chunk::Default, 1010.0),
            ("static", 8, Chunk::Size(4), 170.0),
            ("static", 4, Chunk::Default, 280.0),
        ]);
        let chart = time_chart(&report);
        assert_eq!(chart.ticks, vec![1, 4, 8]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].label, "static");
        assert_eq!(chart.series[0].points, vec![(1, 1040.0), (4, 280.0)]);
        assert_eq!(chart.markers.len(), 2);
        assert_eq!(chart.markers[0].y, 1000.0);
        assert_eq!(chart.markers[0].label, "Serial (1000.0 ms)");
        assert_eq!(chart.markers[1].y, 1010.0);
        assert_eq!(chart.markers[1].shape, MarkerShape::Ring);
        assert!(chart.reference.is_none());
    }

    #[test]
    fn time_chart_without_single_thread_run_has_one_marker() {
        let report = report(vec![
            ("Serial", 1, Chunk::Other("-".into()), 1000.0),
            ("static", 2, Chunk::Default, 520.0),
        ]);
        assert_eq!(time_chart(&report).markers.len(), 1);
    }

    #[test]
    fn speedup_chart_has_break_even_line() {
        let report = report(vec![
            ("Serial", 1, Chunk::Other("-".into()), 1000.0),
            ("static", 2, Chunk::Default, 500.0),
            ("static", 4, Chunk::Default, 250.0),
        ]);
        let chart = speedup_chart(&report);
        assert_eq!(chart.series[0].points, vec![(2, 2.0), (4, 4.0)]);
        assert_eq!(chart.reference.as_ref().map(|r| r.y), Some(1.0));
    }

    #[test]
    fn filename_override() {
        let plot = ThreadTime {
            filename: Some("time.png".to_owned()),
        };
        assert_eq!(plot.filename(), "time.png");
        assert_eq!(ThreadSpeedup::default().filename(), SPEEDUP_FILE);
    }
}
