use common::analysis::{Report, Run};
use eyre::Result;
use itertools::Itertools;
use serde::Serialize;

#[derive(Serialize)]
struct Summary<'a> {
    baseline_schedule: &'a str,
    baseline_ms: f64,
    dropped_rows: usize,
    fastest_single_thread: Option<&'a Run>,
    best: Option<&'a Run>,
    runs: &'a [Run],
}

pub fn print_json(report: &Report) -> Result<()> {
    let summary = Summary {
        baseline_schedule: &report.baseline.schedule,
        baseline_ms: report.baseline.tempo_ms,
        dropped_rows: report.dropped,
        fastest_single_thread: report.fastest_single_thread(),
        best: report.best_run(),
        runs: &report.runs,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn threads_label(run: &Run) -> String {
    run.record
        .threads
        .map_or_else(|| "-".to_owned(), |threads| threads.to_string())
}

pub fn print_table(report: &Report) {
    println!(
        "Baseline: {} at {:.1} ms",
        report.baseline.schedule, report.baseline.tempo_ms
    );
    if report.dropped > 0 {
        println!("Dropped rows: {}", report.dropped);
    }
    match report.fastest_single_thread() {
        Some(run) => println!(
            "Fastest 1-thread run: {} ({:.1} ms, {:.2}x)",
            run.record.schedule, run.record.tempo_ms, run.speedup
        ),
        None => println!("Fastest 1-thread run: none"),
    }
    if let Some(run) = report.best_run() {
        println!(
            "Best speedup: {:.2}x ({}, {} threads, chunk {})",
            run.speedup,
            run.record.schedule,
            threads_label(run),
            run.record.chunk
        );
    }

    println!();
    println!(
        "{:<12} {:>8} {:>10} {:>12} {:>9}",
        "Schedule", "Threads", "Chunk", "Tempo (ms)", "Speedup"
    );
    let ordered = report.runs.iter().sorted_by(|a, b| {
        a.record
            .schedule
            .cmp(&b.record.schedule)
            .then(a.record.threads.cmp(&b.record.threads))
            .then(a.record.chunk.size().cmp(&b.record.chunk.size()))
    });
    for run in ordered {
        println!(
            "{:<12} {:>8} {:>10} {:>12.1} {:>9.2}",
            run.record.schedule,
            threads_label(run),
            run.record.chunk.to_string(),
            run.record.tempo_ms,
            run.speedup
        );
    }
}
