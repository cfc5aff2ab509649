//! Local file source (`.json` or `.csv`).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use explorer_seeker::{FieldValue, Number, Record};
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::source::{records_from_json, FetchRequest, RecordSet, RecordSource};

/// Records stored in a local file.
///
/// The whole file is read on every fetch; server-mode requests are
/// filtered and windowed after reading.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<RecordSet> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| QueryError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "read data file");

        let set = match self.extension().as_deref() {
            Some("json") => {
                let value: serde_json::Value = serde_json::from_slice(&bytes)
                    .map_err(|e| QueryError::parse(self.describe(), e.to_string()))?;
                records_from_json(value, &self.describe())?
            }
            Some("csv") => RecordSet::new(parse_csv(&bytes, &self.path)?),
            _ => return Err(QueryError::UnsupportedFile(self.path.clone())),
        };
        Ok(set.window(request))
    }
}

/// Parses CSV with a header row. Cells are typed: empty cells become null,
/// `true`/`false` booleans, numeric text numbers.
pub fn parse_csv(bytes: &[u8], path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let csv_error = |source: csv::Error| QueryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_string(), typed_cell(cell)))
            .collect::<Record>();
        records.push(record);
    }
    Ok(records)
}

fn typed_cell(cell: &str) -> FieldValue {
    if cell.is_empty() {
        return FieldValue::Null;
    }
    match cell {
        "true" | "TRUE" | "True" => return FieldValue::Bool(true),
        "false" | "FALSE" | "False" => return FieldValue::Bool(false),
        _ => {}
    }
    if let Ok(n) = cell.parse::<i64>() {
        FieldValue::Number(Number::I64(n))
    } else if let Ok(n) = cell.parse::<f64>() {
        FieldValue::Number(Number::F64(n))
    } else {
        FieldValue::String(cell.to_string())
    }
}
