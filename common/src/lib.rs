pub mod analysis;
pub mod config;
pub mod error;
pub mod plot;
pub mod record;
pub mod report;
pub mod util;

pub const DEFAULT_RESULTS_FILE: &str = "omp_results.csv";
