//! Error types for explorer pages.

use std::path::PathBuf;

use explorer_query::QueryError;
use explorer_seeker::SeekerError;
use thiserror::Error;

/// Errors raised while configuring or driving an [`ExplorerPage`](crate::ExplorerPage).
///
/// Fetch failures do not appear here: they are part of the query snapshot
/// and surface through [`ExplorerPage::status_messages`](crate::ExplorerPage::status_messages).
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// An active filter was set on a field with no filter config.
    #[error("no filter is configured for field '{0}'")]
    UnknownFilter(String),

    /// No visible row carries this identifier.
    #[error("no row with id '{0}'")]
    UnknownRow(String),

    /// A chart was requested but no column is marked as a chart cell.
    #[error("no chart column is configured")]
    NoChartColumn,

    /// The filter value does not fit its config.
    #[error(transparent)]
    Filter(#[from] SeekerError),

    /// The data source could not be opened.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The page config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The page config is not valid YAML for a page.
    #[error("invalid page config {origin}: {source}")]
    ConfigParse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The page config parsed but is inconsistent.
    #[error("invalid page config: {0}")]
    InvalidConfig(String),
}

/// Result type for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
