//! Dotted field paths.
//!
//! A [`FieldPath`] addresses a value inside a [`Record`], e.g.
//! `stats.columns`. Resolution walks nested records by key and lists by
//! numeric index, and returns `None` as soon as a segment is missing.

use std::fmt;

use crate::value::{FieldValue, Record};

/// A parsed dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Splits a dotted path into segments. Parsing never fails; malformed
    /// paths (empty segments) simply resolve to nothing.
    pub fn parse(path: &str) -> Self {
        FieldPath {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The individual segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when no segment is empty, i.e. the path can resolve at all.
    pub fn is_valid(&self) -> bool {
        !self.segments.iter().any(String::is_empty)
    }

    /// Resolves this path against a record.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<&'a FieldValue> {
        let (first, rest) = self.segments.split_first()?;
        if first.is_empty() {
            return None;
        }
        let mut current = record.get(first)?;
        for segment in rest {
            current = step(current, segment)?;
        }
        Some(current)
    }
}

fn step<'a>(value: &'a FieldValue, segment: &str) -> Option<&'a FieldValue> {
    if segment.is_empty() {
        return None;
    }
    match value {
        FieldValue::Nested(record) => record.get(segment),
        FieldValue::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}
