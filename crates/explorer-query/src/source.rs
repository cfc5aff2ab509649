//! Record sources.
//!
//! A [`RecordSource`] answers a [`FetchRequest`] with a [`RecordSet`]. In
//! client mode the request asks for the whole collection; in server mode
//! it carries an offset, a page size and the filters, both compiled and
//! translated to query parameters.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use explorer_seeker::{FilterQuery, Record};
use url::Url;

use crate::error::{QueryError, Result};
use crate::file::FileSource;
use crate::http::HttpSource;
use crate::pagination::QueryMode;

/// One fetch issued by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub mode: QueryMode,
    /// First row wanted (server mode).
    pub offset: usize,
    /// Rows wanted; `None` means the whole collection.
    pub limit: Option<usize>,
    /// Query parameters: translated filters plus static params.
    pub params: Vec<(String, String)>,
    /// Compiled filters and search, for sources that narrow locally.
    pub filter: FilterQuery,
}

impl FetchRequest {
    /// A client-mode request for the whole collection.
    pub fn whole(params: Vec<(String, String)>) -> Self {
        FetchRequest {
            mode: QueryMode::Client,
            offset: 0,
            limit: None,
            params,
            filter: FilterQuery::new(),
        }
    }

    /// A server-mode request for one page.
    pub fn page(offset: usize, limit: usize, params: Vec<(String, String)>) -> Self {
        FetchRequest {
            mode: QueryMode::Server,
            offset,
            limit: Some(limit),
            params,
            filter: FilterQuery::new(),
        }
    }

    /// Attaches the compiled filters the params were translated from.
    pub fn with_filter(mut self, filter: FilterQuery) -> Self {
        self.filter = filter;
        self
    }
}

/// Records returned by a fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    pub records: Vec<Record>,
    /// Size of the whole collection, when the source reports it.
    pub total: Option<usize>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        RecordSet {
            records,
            total: None,
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// The reported total, or the number of records held.
    pub fn total_or_len(&self) -> usize {
        self.total.unwrap_or(self.records.len())
    }

    /// Answers a server-mode request from a whole collection held locally:
    /// narrows it by the request's filter, then cuts out the requested
    /// page. The total counts the narrowed collection. Client-mode
    /// requests are returned untouched.
    pub fn window(self, request: &FetchRequest) -> RecordSet {
        let Some(limit) = request.limit else {
            return self;
        };
        let (matching, total) = if request.filter.is_empty() {
            let total = self.total_or_len();
            (self.records, total)
        } else {
            let matching: Vec<Record> = self
                .records
                .into_iter()
                .filter(|record| request.filter.matches(record))
                .collect();
            let total = matching.len();
            (matching, total)
        };
        let records = matching
            .into_iter()
            .skip(request.offset)
            .take(limit)
            .collect();
        RecordSet {
            records,
            total: Some(total),
        }
    }
}

/// Something that can produce records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Stable description used in logs and cache keys.
    fn describe(&self) -> String;

    /// Fetches records for `request`.
    async fn fetch(&self, request: &FetchRequest) -> Result<RecordSet>;
}

/// In-memory records.
///
/// Server-mode requests are narrowed by the request's filter and then
/// windowed by offset and limit.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    records: Vec<Record>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        StaticSource {
            name: name.into(),
            records,
        }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        format!("static:{}", self.name)
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<RecordSet> {
        Ok(RecordSet::new(self.records.clone()).window(request))
    }
}

/// A data source identifier: a local file or a remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Http(Url),
}

impl DataSource {
    /// `http://` and `https://` identifiers are endpoints; anything else is
    /// a file path.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|source| QueryError::Url {
                input: trimmed.to_string(),
                source,
            })?;
            Ok(DataSource::Http(url))
        } else {
            Ok(DataSource::File(PathBuf::from(trimmed)))
        }
    }

    /// Builds the matching source.
    pub fn open(self) -> Result<Arc<dyn RecordSource>> {
        match self {
            DataSource::File(path) => Ok(Arc::new(FileSource::new(path))),
            DataSource::Http(url) => Ok(Arc::new(HttpSource::new(url)?)),
        }
    }
}

/// Reads a JSON payload as a record collection.
///
/// Accepts a bare array of objects or an envelope
/// `{ "data": [...], "total_count": n }`.
pub fn records_from_json(value: serde_json::Value, origin: &str) -> Result<RecordSet> {
    let (items, total) = match value {
        serde_json::Value::Array(items) => (items, None),
        serde_json::Value::Object(mut map) => {
            let total = map
                .get("total_count")
                .and_then(serde_json::Value::as_u64)
                .map(|n| n as usize);
            match map.remove("data") {
                Some(serde_json::Value::Array(items)) => (items, total),
                _ => {
                    return Err(QueryError::parse(
                        origin,
                        "expected an array of records or an object with a 'data' array",
                    ))
                }
            }
        }
        _ => {
            return Err(QueryError::parse(
                origin,
                "expected an array of records or an object with a 'data' array",
            ))
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Record::from_json(item)
                .map_err(|e| QueryError::parse(origin, format!("item {}: {}", i, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RecordSet { records, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new().with("id", i as u64))
            .collect()
    }

    #[test]
    fn window_cuts_server_pages() {
        let set = RecordSet::new(numbered(30)).window(&FetchRequest::page(25, 10, Vec::new()));
        assert_eq!(set.records.len(), 5);
        assert_eq!(set.total, Some(30));
    }

    #[test]
    fn window_leaves_client_requests_whole() {
        let set = RecordSet::new(numbered(30)).window(&FetchRequest::whole(Vec::new()));
        assert_eq!(set.records.len(), 30);
        assert_eq!(set.total, None);
        assert_eq!(set.total_or_len(), 30);
    }

    #[test]
    fn parses_bare_arrays_and_envelopes() {
        let set = records_from_json(json!([{"a": 1}, {"a": 2}]), "test").unwrap();
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.total, None);

        let set = records_from_json(json!({"data": [{"a": 1}], "total_count": 40}), "test").unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.total, Some(40));
    }

    #[test]
    fn rejects_non_collections() {
        let err = records_from_json(json!({"items": []}), "test").unwrap_err();
        assert!(err.to_string().contains("invalid data from test"));
        let err = records_from_json(json!([1, 2]), "test").unwrap_err();
        assert!(err.to_string().contains("item 0"));
    }

    #[test]
    fn data_source_parsing() {
        assert!(matches!(
            DataSource::parse("https://example.org/projects").unwrap(),
            DataSource::Http(_)
        ));
        assert_eq!(
            DataSource::parse("dummy-data/explor.json").unwrap(),
            DataSource::File(PathBuf::from("dummy-data/explor.json"))
        );
        assert!(matches!(
            DataSource::parse("http://"),
            Err(QueryError::Url { .. })
        ));
    }

    #[tokio::test]
    async fn static_source_windows_in_server_mode() {
        let source = StaticSource::new("numbers", numbered(12));
        let page = source
            .fetch(&FetchRequest::page(10, 5, Vec::new()))
            .await
            .unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total, Some(12));
        assert_eq!(source.describe(), "static:numbers");
    }
}
