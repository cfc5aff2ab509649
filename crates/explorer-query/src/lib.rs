//! Query - client/server pagination for record explorers.
//!
//! This crate decides where a page of records comes from:
//!
//! - [`Pagination`] tracks `page`, `page_size`, the derived `offset` and
//!   the [`QueryMode`]
//! - [`RecordSource`] implementations load records from memory, local
//!   `.json`/`.csv` files or HTTP endpoints
//! - [`server_params`] translates active filters into query parameters for
//!   endpoints that filter remotely
//! - [`ListQuery`] fetches, caches and exposes the result as a
//!   [`QuerySnapshot`] (`pending → success | error`, plus `is_fetching`)
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use explorer_query::{ListQuery, Pagination, QueryInput, QueryMode, StaticSource};
//! use explorer_seeker::{ActiveFilters, FilterConfigs, Record};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let source = StaticSource::new("demo", vec![Record::new().with("title", "Alpha")]);
//! let query = ListQuery::new(Arc::new(source));
//!
//! let active = ActiveFilters::new();
//! let configs = FilterConfigs::default();
//! let snapshot = query
//!     .refresh(&QueryInput {
//!         active: &active,
//!         configs: &configs,
//!         search: "",
//!         pagination: Pagination::new(QueryMode::Client),
//!     })
//!     .await;
//!
//! assert!(snapshot.is_success());
//! assert_eq!(snapshot.records().len(), 1);
//! # });
//! ```

mod adapter;
mod error;
mod file;
mod http;
mod pagination;
mod params;
mod source;
mod status;

pub use adapter::{ListQuery, QueryInput};
pub use error::{QueryError, Result};
pub use file::{parse_csv, FileSource};
pub use http::{HttpSource, LIMIT_PARAM, OFFSET_PARAM};
pub use pagination::{Pagination, PaginationModel, QueryMode, DEFAULT_PAGE_SIZE};
pub use params::{param_key, server_params, SEARCH_PARAM};
pub use source::{records_from_json, DataSource, FetchRequest, RecordSet, RecordSource, StaticSource};
pub use status::{QuerySnapshot, QueryStatus};
