//! Remote endpoint source.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{QueryError, Result};
use crate::pagination::QueryMode;
use crate::source::{records_from_json, FetchRequest, RecordSet, RecordSource};

const USER_AGENT: &str = concat!("record-explorer/", env!("CARGO_PKG_VERSION"));

/// Query parameter carrying the first row of a server page.
pub const OFFSET_PARAM: &str = "_skip";
/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "_limit";

/// Records served by an HTTP endpoint returning JSON.
///
/// Client mode requests the URL as configured (plus static params).
/// Server mode adds offset, page size and translated filter parameters.
/// Timeouts are left to the transport defaults.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| QueryError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(HttpSource { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The full URL fetched for `request`.
    pub fn request_url(&self, request: &FetchRequest) -> Url {
        let mut url = self.url.clone();
        if request.mode == QueryMode::Server || !request.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let (QueryMode::Server, Some(limit)) = (request.mode, request.limit) {
                pairs.append_pair(OFFSET_PARAM, &request.offset.to_string());
                pairs.append_pair(LIMIT_PARAM, &limit.to_string());
            }
            for (key, value) in &request.params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<RecordSet> {
        let url = self.request_url(request);
        debug!(%url, "fetching records");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| QueryError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| QueryError::Http {
            url: url.to_string(),
            source,
        })?;
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| QueryError::parse(url.to_string(), e.to_string()))?;
        records_from_json(value, url.as_str())
    }
}
