use common::plot::Plot;

mod chunk;
mod threads;

pub use chunk::{CHUNK_IMPACT_FILE, ChunkImpact, chunk_chart};
pub use threads::{
    SPEEDUP_FILE, THREAD_TIME_FILE, ThreadSpeedup, ThreadTime, speedup_chart, time_chart,
};

/// Charts rendered when the config does not list any
pub fn default_plots() -> Vec<Box<dyn Plot>> {
    vec![
        Box::new(ThreadTime::default()),
        Box::new(ThreadSpeedup::default()),
        Box::new(ChunkImpact::default()),
    ]
}
