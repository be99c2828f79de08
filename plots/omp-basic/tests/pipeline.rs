use std::{fs, path::Path};

use common::{
    config::Config,
    error::ReportError,
    plot::{Plot, PlotOutcome},
    report::{generate, load_report},
};
use omp_basic::{CHUNK_IMPACT_FILE, ChunkImpact, SPEEDUP_FILE, THREAD_TIME_FILE, default_plots};

fn config_for(dir: &Path, csv: &str) -> Config {
    let input = dir.join("omp_results.csv");
    fs::write(&input, csv).unwrap();
    Config {
        input,
        output_dir: dir.join("plots"),
        ..Config::default()
    }
}

fn pngs(dir: &Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".png"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[test]
fn no_serial_row_produces_no_charts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "Schedule,Threads,Chunk,Tempo_ms\nstatic,1,default,900\nstatic,4,default,250\n",
    );

    let err = generate(&config, &default_plots()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReportError>(),
        Some(ReportError::MissingBaseline { .. })
    ));
    assert!(pngs(&config.output_dir).is_empty());
    assert!(pngs(dir.path()).is_empty());
}

#[test]
fn missing_results_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        input: dir.path().join("omp_results.csv"),
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let err = generate(&config, &default_plots()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReportError>(),
        Some(ReportError::MissingInput(_))
    ));
    assert!(pngs(dir.path()).is_empty());
}

#[test]
fn unparseable_duration_is_excluded_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "Schedule,Threads,Chunk,Tempo_ms\n\
         Serial,1,N/A,1000\n\
         static,2,default,timeout\n\
         static,4,default,250\n\
         dynamic,4,8,200\n",
    );

    let report = load_report(&config).unwrap();
    assert_eq!(report.dropped, 1);
    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.thread_counts(), vec![4]);
    assert_eq!(report.runs[0].speedup, 4.0);
    assert_eq!(report.runs[1].speedup, 5.0);
}

#[test]
fn chunk_chart_is_omitted_when_all_chunks_are_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "Schedule,Threads,Chunk,Tempo_ms\n\
         Serial,1,N/A,1000\n\
         static,2,default,520\n\
         dynamic,2,default,510\n",
    );

    let plots: Vec<Box<dyn Plot>> = vec![Box::new(ChunkImpact::default())];
    let outcomes = generate(&config, &plots).unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], PlotOutcome::Skipped { .. }));
    assert!(config.output_dir.is_dir());
    assert!(!config.output_dir.join(CHUNK_IMPACT_FILE).exists());
}

#[test]
fn config_file_selects_plots() {
    let yaml = "\
input: bench/omp_results.csv
settings:
  baseline_schedule: Naive
plots:
  - type: ThreadSpeedup
  - type: ChunkImpact
    filename: chunks.png
";
    let config: Config = serde_yml::from_str(yaml).unwrap();
    assert_eq!(config.settings.baseline_schedule, "Naive");
    let plots = config.plots.unwrap();
    assert_eq!(plots.len(), 2);
    assert_eq!(plots[0].name(), "thread-speedup");
    assert_eq!(plots[0].filename(), SPEEDUP_FILE);
    assert_eq!(plots[1].filename(), "chunks.png");
}

#[test]
fn default_plots_use_fixed_file_names() {
    let names = default_plots()
        .iter()
        .map(|p| p.filename().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec![THREAD_TIME_FILE, SPEEDUP_FILE, CHUNK_IMPACT_FILE]);
}

#[test]
fn default_plots_render_all_three_charts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "Schedule,Threads,Chunk,Tempo_ms\n\
         Serial,1,N/A,1000\n\
         static,1,default,1050\n\
         dynamic,1,default,1100\n\
         static,4,default,280\n\
         dynamic,4,default,300\n\
         static,4,8,270\n\
         dynamic,4,8,260\n\
         static,4,64,290\n\
         dynamic,4,64,250\n",
    );

    let outcomes = generate(&config, &default_plots()).unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(
        outcomes
            .iter()
            .all(|outcome| matches!(outcome, PlotOutcome::Written(_)))
    );
    for name in [THREAD_TIME_FILE, SPEEDUP_FILE, CHUNK_IMPACT_FILE] {
        let path = config.output_dir.join(name);
        assert!(fs::metadata(&path).unwrap().len() > 0, "{} is empty", path.display());
    }
}

#[test]
fn serial_row_without_thread_count_is_still_the_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "Schedule,Threads,Chunk,Tempo_ms\n\
         Serial,,N/A,1000\n\
         static,4,default,250\n",
    );

    let report = load_report(&config).unwrap();
    assert_eq!(report.dropped, 0);
    assert_eq!(report.baseline.threads, None);
    assert_eq!(report.baseline.tempo_ms, 1000.0);
    assert_eq!(report.runs.len(), 1);
    assert_eq!(report.runs[0].speedup, 4.0);
    assert_eq!(report.thread_counts(), vec![4]);
}
