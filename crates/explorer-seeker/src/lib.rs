//! Seeker - record model and filter engine for data explorers.
//!
//! Seeker narrows in-memory collections of schema-less [`Record`]s. It
//! provides:
//!
//! - An explicit value model: strings, numbers, booleans, lists and nested
//!   records, addressed with dotted paths (`stats.columns`)
//! - A declarative filter registry ([`FilterConfigs`]) describing each
//!   filterable field, its operator and its editing control
//! - Three operators: `contains`, `equals-one-of`, `between-inclusive`
//! - A pure, order-preserving engine combining active filters with a
//!   free-text search
//!
//! # Quick Start
//!
//! ```rust
//! use explorer_seeker::{filter_data, ActiveFilters, FilterConfig, FilterConfigs, FilterValue, Record};
//! use serde_json::json;
//!
//! let records = vec![
//!     Record::from_json(json!({"title": "Alpha", "stats": {"columns": 10}})).unwrap(),
//!     Record::from_json(json!({"title": "Beta", "stats": {"columns": 500}})).unwrap(),
//! ];
//!
//! let configs: FilterConfigs = vec![
//!     FilterConfig::text("title", "Project Title"),
//!     FilterConfig::range("stats.columns", "Number of Columns", 0.0, 800.0),
//! ]
//! .into();
//!
//! let active = ActiveFilters::new().with("stats.columns", FilterValue::range(0.0, 100.0));
//!
//! let results = filter_data(&records, &active, &configs, "");
//! assert_eq!(results.len(), 1);
//! ```
//!
//! # Match Semantics
//!
//! ```text
//! match = (every active filter matches)
//!       ∧ (no search term, OR the term occurs in some string field)
//! ```
//!
//! | Operator | Value | Passes when |
//! |----------|-------|-------------|
//! | `contains` | text | lowercased field text contains the lowercased value; empty value passes |
//! | `equals-one-of` | set | field equals a member; empty set passes |
//! | `between-inclusive` | `{min, max}` | field is numeric and `min <= v <= max` |
//!
//! Missing paths never raise: they fail value operators and are skipped
//! by search. Active filters with no config are ignored.

mod clause;
mod config;
mod error;
mod filters;
mod op;
mod path;
mod query;
mod value;

// Re-export public API
pub use clause::{Clause, FilterValue};
pub use config::{FilterConfig, FilterConfigs, FilterControl, FilterOption, FilterProps};
pub use error::{Result, SeekerError};
pub use filters::ActiveFilters;
pub use op::FilterOp;
pub use path::FieldPath;
pub use query::{filter_data, FilterQuery};
pub use value::{FieldValue, Number, Record};
