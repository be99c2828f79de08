use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::{
    config::Settings,
    error::ReportError,
    record::{Chunk, Record, ResultTable},
    util::{group_means, unique_in_order},
};

/// Ratio of the baseline duration to a run's duration
pub fn speedup(baseline_ms: f64, tempo_ms: f64) -> f64 {
    baseline_ms / tempo_ms
}

/// First run carrying the baseline schedule label
pub fn find_baseline<'a>(records: &'a [Record], schedule: &str) -> Option<&'a Record> {
    records.iter().find(|r| r.schedule == schedule)
}

/// A parallel run together with its derived speedup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    #[serde(flatten)]
    pub record: Record,
    pub speedup: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TempoMs,
    Speedup,
}

impl Metric {
    fn value(&self, run: &Run) -> f64 {
        match self {
            Metric::TempoMs => run.record.tempo_ms,
            Metric::Speedup => run.speedup,
        }
    }
}

/// One line of a per-schedule chart, mean value per thread count
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub schedule: String,
    pub points: Vec<(u32, f64)>,
}

/// Bars of one chunk size, mean duration per schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkGroup {
    pub chunk: u64,
    pub bars: Vec<(String, f64)>,
}

/// The derived table every chart is rendered from
#[derive(Debug, Clone)]
pub struct Report {
    pub baseline: Record,
    /// Every non-baseline run, in file order
    pub runs: Vec<Run>,
    pub dropped: usize,
}

impl Report {
    pub fn build(table: ResultTable, settings: &Settings) -> Result<Self, ReportError> {
        let baseline = find_baseline(&table.records, &settings.baseline_schedule)
            .cloned()
            .ok_or_else(|| ReportError::MissingBaseline {
                schedule: settings.baseline_schedule.clone(),
            })?;

        let runs = table
            .records
            .into_iter()
            .filter(|r| r.schedule != settings.baseline_schedule)
            .map(|record| Run {
                speedup: speedup(baseline.tempo_ms, record.tempo_ms),
                record,
            })
            .collect::<Vec<_>>();
        debug!("Derived speedup for {} runs", runs.len());

        Ok(Self {
            baseline,
            runs,
            dropped: table.dropped,
        })
    }

    pub fn baseline_speedup(&self) -> f64 {
        speedup(self.baseline.tempo_ms, self.baseline.tempo_ms)
    }

    /// Fastest parallel run executed with a single thread, if any
    pub fn fastest_single_thread(&self) -> Option<&Run> {
        self.runs
            .iter()
            .filter(|run| run.record.threads == Some(1))
            .min_by(|a, b| a.record.tempo_ms.total_cmp(&b.record.tempo_ms))
    }

    /// Run with the highest finite speedup
    pub fn best_run(&self) -> Option<&Run> {
        self.runs
            .iter()
            .filter(|run| run.speedup.is_finite())
            .max_by(|a, b| a.speedup.total_cmp(&b.speedup))
    }

    pub fn schedules(&self) -> Vec<String> {
        unique_in_order(self.runs.iter().map(|run| run.record.schedule.clone()))
    }

    /// Sorted distinct thread counts of the parallel runs
    pub fn thread_counts(&self) -> Vec<u32> {
        self.runs
            .iter()
            .filter_map(|run| run.record.threads)
            .unique()
            .sorted()
            .collect()
    }

    pub fn max_threads(&self) -> Option<u32> {
        self.runs.iter().filter_map(|run| run.record.threads).max()
    }

    pub fn default_chunk_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs
            .iter()
            .filter(|run| run.record.chunk == Chunk::Default)
    }

    /// Per-schedule lines over the default-chunk runs, sorted by thread count.
    ///
    /// Non-finite values and runs without a thread count never make it into a series.
    pub fn thread_series(&self, metric: Metric) -> Vec<Series> {
        let means = group_means(
            self.default_chunk_runs()
                .filter_map(|run| {
                    let threads = run.record.threads?;
                    Some(((run.record.schedule.clone(), threads), metric.value(run)))
                })
                .filter(|(_, value)| value.is_finite()),
        );
        let schedules = unique_in_order(means.iter().map(|((schedule, _), _)| schedule.clone()));
        schedules
            .into_iter()
            .map(|schedule| {
                let points = means
                    .iter()
                    .filter(|((s, _), _)| *s == schedule)
                    .map(|((_, threads), value)| (*threads, *value))
                    .sorted_by_key(|(threads, _)| *threads)
                    .collect();
                Series { schedule, points }
            })
            .collect()
    }

    /// Runs at the highest thread count with an explicit chunk size, grouped by chunk size.
    ///
    /// Empty when there is nothing to compare, in which case the chunk chart is skipped.
    pub fn chunk_groups(&self) -> Vec<ChunkGroup> {
        let Some(max_threads) = self.max_threads() else {
            return Vec::new();
        };
        let selected = self
            .runs
            .iter()
            .filter(|run| run.record.threads == Some(max_threads))
            .filter_map(|run| {
                let size = run.record.chunk.size()?;
                Some(((size, run.record.schedule.clone()), run.record.tempo_ms))
            });
        let means = group_means(selected);

        means
            .iter()
            .map(|((chunk, _), _)| *chunk)
            .unique()
            .sorted()
            .map(|chunk| ChunkGroup {
                chunk,
                bars: means
                    .iter()
                    .filter(|((c, _), _)| *c == chunk)
                    .map(|((_, schedule), tempo)| (schedule.clone(), *tempo))
                    .collect(),
            })
            .collect()
    }
}
