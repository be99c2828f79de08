use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a report before any chart is written.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("results file '{0}' was not found, run the benchmarks first")]
    MissingInput(PathBuf),
    #[error("results file '{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("no '{schedule}' baseline run in the results, aborting")]
    MissingBaseline { schedule: String },
}
