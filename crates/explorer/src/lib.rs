//! # Explorer - filterable, paginated record pages
//!
//! An explorer page shows a collection of schema-less records as a table.
//! Users narrow it with declarative filters and a free-text search, page
//! through it, open one record in a preview panel and hover a chart cell to
//! compare one row against all filtered rows.
//!
//! The crate brings together:
//!
//! - [`explorer_seeker`]: the record model, filter configs and the pure
//!   filter engine
//! - [`explorer_query`]: record sources and the client/server pagination
//!   adapter
//! - [`FilterStore`]: the page's active filters with explicit subscribers
//! - [`ExplorerPage`]: the controller tying filters, search, paging, data
//!   and preview together
//! - [`views`]: serializable view-models with text rendering
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use explorer::{ExplorerPage, PageConfig};
//! use explorer_query::StaticSource;
//! use explorer_seeker::Record;
//!
//! let config = PageConfig::from_yaml_str(r#"
//! title: Projects
//! data_source: memory
//! filters:
//!   - { field: title, label: Title, operator: contains }
//! columns:
//!   - { field: id, header: ID, width: 4 }
//!   - { field: title, header: Title, width: 12 }
//! "#).unwrap();
//!
//! let records = vec![
//!     Record::new().with("id", 1).with("title", "Alpha"),
//!     Record::new().with("id", 2).with("title", "Beta"),
//! ];
//! let page = ExplorerPage::new(&config, Arc::new(StaticSource::new("demo", records)));
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! page.load().await;
//! page.set_filter("title", "alp").unwrap();
//!
//! let table = page.table();
//! assert_eq!(table.rows.len(), 1);
//! assert_eq!(table.rows[0].id, "1");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod page;
pub mod store;
pub mod views;

pub use config::{ColumnConfig, ColumnKind, PageConfig};
pub use error::{ExplorerError, Result};
pub use page::ExplorerPage;
pub use store::{FilterStore, Subscription};
pub use views::{
    Bar, Cell, CellContext, ChartView, Column, Message, MessageLevel, PreviewField, PreviewView,
    TableRow, TableView,
};

pub use explorer_query::{PaginationModel, QueryMode, QuerySnapshot, QueryStatus};
pub use explorer_seeker::{ActiveFilters, FieldValue, FilterConfig, FilterConfigs, FilterValue, Record};
