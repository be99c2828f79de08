use std::{
    fmt::{self, Display},
    fs::File,
    io::{self, Read},
    path::Path,
};

use csv::{ReaderBuilder, Trim};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::{config::Settings, error::ReportError};

pub const REQUIRED_COLUMNS: [&str; 4] = ["Schedule", "Threads", "Chunk", "Tempo_ms"];

/// Work-partition granularity of a scheduling strategy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Chunk {
    /// The scheduler picked the chunk size itself
    Default,
    Size(u64),
    /// Any other label, e.g. the placeholder used by the serial run
    Other(String),
}

impl Chunk {
    pub fn parse(raw: &str, default_label: &str) -> Self {
        let raw = raw.trim();
        if raw == default_label {
            Chunk::Default
        } else if let Ok(size) = raw.parse::<u64>() {
            Chunk::Size(size)
        } else {
            Chunk::Other(raw.to_owned())
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self {
            Chunk::Size(size) => Some(*size),
            _ => None,
        }
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Default => write!(f, "default"),
            Chunk::Size(size) => write!(f, "{size}"),
            Chunk::Other(label) => write!(f, "{label}"),
        }
    }
}

impl Serialize for Chunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One timed benchmark execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub schedule: String,
    /// `None` when the thread count is blank or not an integer
    pub threads: Option<u32>,
    pub chunk: Chunk,
    pub tempo_ms: f64,
}

/// Row as it appears in the file, before coercion
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Schedule")]
    schedule: String,
    #[serde(rename = "Threads")]
    threads: String,
    #[serde(rename = "Chunk")]
    chunk: String,
    #[serde(rename = "Tempo_ms")]
    tempo_ms: String,
}

impl RawRecord {
    fn coerce(self, settings: &Settings) -> Option<Record> {
        let tempo_ms = self.tempo_ms.parse::<f64>().ok().filter(|t| t.is_finite())?;
        Some(Record {
            schedule: self.schedule,
            threads: self.threads.parse::<u32>().ok(),
            chunk: Chunk::parse(&self.chunk, &settings.default_chunk),
            tempo_ms,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub records: Vec<Record>,
    /// Rows discarded because the duration could not be coerced
    pub dropped: usize,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_records(path: &Path, settings: &Settings) -> Result<ResultTable> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ReportError::MissingInput(path.to_path_buf()).into());
        }
        Err(err) => return Err(err).wrap_err_with(|| format!("Open {}", path.display())),
    };
    parse_records(file, path, settings)
}

/// Parses result rows, silently dropping those whose duration does not coerce.
///
/// `path` is only used for diagnostics.
pub fn parse_records<R: Read>(reader: R, path: &Path, settings: &Settings) -> Result<ResultTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .wrap_err_with(|| format!("Read header of {}", path.display()))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn {
                path: path.to_path_buf(),
                column,
            }
            .into());
        }
    }

    let mut table = ResultTable::default();
    for (idx, row) in reader.deserialize::<RawRecord>().enumerate() {
        // header is line 1
        let line = idx + 2;
        match row {
            Ok(raw) => match raw.coerce(settings) {
                Some(record) => table.records.push(record),
                None => {
                    debug!("Dropping line {line}: non-numeric Tempo_ms");
                    table.dropped += 1;
                }
            },
            Err(err) => {
                warn!("Dropping line {line}: {err}");
                table.dropped += 1;
            }
        }
    }
    Ok(table)
}
