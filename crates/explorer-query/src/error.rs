//! Error types for record fetching.

use std::path::PathBuf;

use thiserror::Error;

/// Transport and parse failures while loading records.
///
/// These are the only errors that reach the user: the adapter turns them
/// into the human-readable message of an error snapshot.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Reading a local file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// The payload was not a record collection.
    #[error("invalid data from {origin}: {message}")]
    Parse { origin: String, message: String },

    /// A CSV file could not be parsed.
    #[error("invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data source looked like a URL but did not parse as one.
    #[error("invalid data source URL '{input}': {source}")]
    Url {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// A local file with an extension no reader handles.
    #[error("unsupported data file {} (expected .json or .csv)", .0.display())]
    UnsupportedFile(PathBuf),
}

impl QueryError {
    pub(crate) fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
