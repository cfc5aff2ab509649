//! The filter-application engine.
//!
//! [`FilterQuery`] narrows a record set with a conjunction of compiled
//! clauses plus an optional free-text search:
//!
//! ```text
//! match = (every clause matches)
//!       ∧ (no search term, OR the term occurs in some string field)
//! ```
//!
//! Evaluation is pure and order-preserving. Anomalies (missing paths,
//! non-numeric values under a range, unknown filter fields) make a record
//! fail the affected clause, or drop the clause entirely, and never raise.

use tracing::debug;

use crate::clause::{Clause, FilterValue};
use crate::config::FilterConfigs;
use crate::filters::ActiveFilters;
use crate::op::FilterOp;
use crate::value::{FieldValue, Record};

/// A compiled filter pass.
///
/// # Example
///
/// ```
/// use explorer_seeker::{ActiveFilters, FilterConfig, FilterConfigs, FilterQuery, FilterValue, Record};
/// use serde_json::json;
///
/// let records: Vec<Record> = vec![
///     Record::from_json(json!({"title": "Alpha", "stats": {"columns": 10}})).unwrap(),
///     Record::from_json(json!({"title": "Beta", "stats": {"columns": 500}})).unwrap(),
/// ];
/// let configs: FilterConfigs =
///     vec![FilterConfig::range("stats.columns", "Columns", 0.0, 800.0)].into();
/// let active = ActiveFilters::new().with("stats.columns", FilterValue::range(0.0, 100.0));
///
/// let query = FilterQuery::compile(&active, &configs, "a");
/// let results = query.filter(&records);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].resolve("title").and_then(|v| v.as_str()), Some("Alpha"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterQuery {
    clauses: Vec<Clause>,
    search: Option<String>,
}

impl FilterQuery {
    /// Creates an empty query. An empty query matches every record.
    pub fn new() -> Self {
        FilterQuery::default()
    }

    /// Compiles active filters against the registry.
    ///
    /// Entries whose field has no config are ignored.
    pub fn compile(active: &ActiveFilters, configs: &FilterConfigs, search: &str) -> Self {
        let mut query = FilterQuery::new();
        for (field, value) in active.iter() {
            match configs.get(field) {
                Some(config) => {
                    query
                        .clauses
                        .push(Clause::new(config.path(), config.operator, value.clone()));
                }
                None => debug!(field, "ignoring active filter without a config"),
            }
        }
        query.search(search)
    }

    /// Adds a clause.
    pub fn clause(mut self, field: &str, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        self.clauses.push(Clause::new(field, op, value));
        self
    }

    /// Sets the free-text search term. An empty term clears the search;
    /// any other term, whitespace included, is matched as typed.
    pub fn search(mut self, term: &str) -> Self {
        self.search = (!term.is_empty()).then(|| term.to_lowercase());
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The normalized (lowercased) search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns `true` if the query places no constraint.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.search.is_none()
    }

    /// Tests a single record.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.clauses.iter().all(|clause| clause.matches(record)) {
            return false;
        }
        match &self.search {
            Some(needle) => record_contains(record, needle),
            None => true,
        }
    }

    /// Returns matching records in their original order.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    /// Like [`filter`](Self::filter), but clones the matches.
    pub fn filter_cloned(&self, records: &[Record]) -> Vec<Record> {
        self.filter(records).into_iter().cloned().collect()
    }

    /// Counts matching records.
    pub fn count(&self, records: &[Record]) -> usize {
        records.iter().filter(|record| self.matches(record)).count()
    }

    /// Returns the first matching record.
    pub fn find<'a>(&self, records: &'a [Record]) -> Option<&'a Record> {
        records.iter().find(|record| self.matches(record))
    }
}

/// Narrows `records` with the active filters and a search term.
///
/// Pure and stable: the output keeps the relative order of the input.
/// With no active filters and an empty search term the whole input is
/// returned.
pub fn filter_data<'a>(
    records: &'a [Record],
    active: &ActiveFilters,
    configs: &FilterConfigs,
    search: &str,
) -> Vec<&'a Record> {
    FilterQuery::compile(active, configs, search).filter(records)
}

fn record_contains(record: &Record, needle: &str) -> bool {
    record.iter().any(|(_, value)| value_contains(value, needle))
}

// Only string-typed leaves take part in search.
fn value_contains(value: &FieldValue, needle: &str) -> bool {
    match value {
        FieldValue::String(s) => s.to_lowercase().contains(needle),
        FieldValue::List(items) => items.iter().any(|item| value_contains(item, needle)),
        FieldValue::Nested(record) => record_contains(record, needle),
        FieldValue::Null | FieldValue::Bool(_) | FieldValue::Number(_) => false,
    }
}
