use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_RESULTS_FILE, plot::Plot};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub settings: Settings,
    pub style: PlotStyle,
    pub plots: Option<Vec<Box<dyn Plot>>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_RESULTS_FILE),
            output_dir: PathBuf::from("."),
            settings: Settings::default(),
            style: PlotStyle::default(),
            plots: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Read config file {}", path.display()))?;
        serde_yml::from_str(&data).wrap_err_with(|| format!("Parse config file {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Schedule label of the unparallelized reference run
    pub baseline_schedule: String,
    /// Chunk label used by runs that kept the scheduler's default chunk size
    pub default_chunk: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            baseline_schedule: "Serial".to_owned(),
            default_chunk: "default".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            font_family: "sans-serif".to_owned(),
        }
    }
}
