//! Filter values and compiled clauses.
//!
//! A [`FilterValue`] is what the user supplied for one filter. A [`Clause`]
//! pairs it with the operator and parsed path of the matching config so it
//! can be evaluated against records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::op::FilterOp;
use crate::path::FieldPath;
use crate::value::{FieldValue, Number, Record};

/// Current value of one active filter.
///
/// The shape depends on the operator: text for `contains`, a set of
/// accepted values for `equals-one-of`, bounds for `between-inclusive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Substring to look for.
    Text(String),
    /// Accepted values.
    OneOf(Vec<FieldValue>),
    /// Inclusive numeric bounds.
    Range { min: f64, max: f64 },
}

impl FilterValue {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        FilterValue::Text(s.into())
    }

    /// Creates a set-membership value.
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        FilterValue::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Creates an inclusive range value.
    pub fn range(min: f64, max: f64) -> Self {
        FilterValue::Range { min, max }
    }

    /// An empty value places no constraint; stores drop such entries.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::OneOf(values) => values.is_empty(),
            FilterValue::Range { .. } => false,
        }
    }

    /// Short shape name used in logs and messages.
    pub fn shape(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::OneOf(_) => "set",
            FilterValue::Range { .. } => "range",
        }
    }

    /// Evaluates this value under `op` against a resolved field.
    ///
    /// `None` means the path did not resolve. A value whose shape does not
    /// fit the operator never matches.
    pub fn matches(&self, op: FilterOp, field: Option<&FieldValue>) -> bool {
        match op {
            FilterOp::Contains => self.match_contains(field),
            FilterOp::EqualsOneOf => self.match_one_of(field),
            FilterOp::BetweenInclusive => self.match_between(field),
        }
    }

    fn match_contains(&self, field: Option<&FieldValue>) -> bool {
        let FilterValue::Text(needle) = self else {
            return false;
        };
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        field
            .and_then(FieldValue::display)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    }

    fn match_one_of(&self, field: Option<&FieldValue>) -> bool {
        let FilterValue::OneOf(accepted) = self else {
            return false;
        };
        if accepted.is_empty() {
            return true;
        }
        match field {
            Some(value) if value.is_scalar() => {
                accepted.iter().any(|candidate| candidate.same_value(value))
            }
            _ => false,
        }
    }

    fn match_between(&self, field: Option<&FieldValue>) -> bool {
        let FilterValue::Range { min, max } = self else {
            return false;
        };
        let Some(n) = field.and_then(FieldValue::as_number) else {
            return false;
        };
        let above_min = n.compare(Number::F64(*min));
        let below_max = n.compare(Number::F64(*max));
        matches!(above_min, Some(Ordering::Greater | Ordering::Equal))
            && matches!(below_max, Some(Ordering::Less | Ordering::Equal))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<Vec<FieldValue>> for FilterValue {
    fn from(values: Vec<FieldValue>) -> Self {
        FilterValue::OneOf(values)
    }
}

impl From<(f64, f64)> for FilterValue {
    fn from((min, max): (f64, f64)) -> Self {
        FilterValue::Range { min, max }
    }
}

/// A single compiled filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// The path of the field to test.
    pub path: FieldPath,
    /// The operator declared by the filter's config.
    pub op: FilterOp,
    /// The user-supplied value.
    pub value: FilterValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(path: impl Into<FieldPath>, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Clause {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates this clause against a record.
    pub fn matches(&self, record: &Record) -> bool {
        self.value.matches(self.op, self.path.resolve(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> FieldValue {
        FieldValue::String(text.into())
    }

    #[test]
    fn contains_is_case_insensitive() {
        let value = FilterValue::text("Foo");
        assert!(value.matches(FilterOp::Contains, Some(&s("xxfooyy"))));
        assert!(value.matches(FilterOp::Contains, Some(&s("FOO"))));
        assert!(!value.matches(FilterOp::Contains, Some(&s("fo"))));
    }

    #[test]
    fn contains_stringifies_scalars() {
        let value = FilterValue::text("50");
        assert!(value.matches(FilterOp::Contains, Some(&FieldValue::from(500i64))));
        let value = FilterValue::text("tru");
        assert!(value.matches(FilterOp::Contains, Some(&FieldValue::from(true))));
    }

    #[test]
    fn contains_empty_needle_passes_everything() {
        let value = FilterValue::text("");
        assert!(value.matches(FilterOp::Contains, None));
        assert!(value.matches(FilterOp::Contains, Some(&s("x"))));
    }

    #[test]
    fn contains_missing_or_structured_field_fails() {
        let value = FilterValue::text("a");
        assert!(!value.matches(FilterOp::Contains, None));
        assert!(!value.matches(FilterOp::Contains, Some(&FieldValue::Null)));
        assert!(!value.matches(
            FilterOp::Contains,
            Some(&FieldValue::Nested(Record::new().with("a", "a")))
        ));
    }

    #[test]
    fn one_of_membership() {
        let value = FilterValue::one_of([true]);
        assert!(value.matches(FilterOp::EqualsOneOf, Some(&FieldValue::from(true))));
        assert!(!value.matches(FilterOp::EqualsOneOf, Some(&FieldValue::from(false))));
        assert!(!value.matches(FilterOp::EqualsOneOf, None));

        let value = FilterValue::one_of([1i64, 2]);
        assert!(value.matches(FilterOp::EqualsOneOf, Some(&FieldValue::from(2.0))));
        assert!(!value.matches(FilterOp::EqualsOneOf, Some(&s("2"))));
    }

    #[test]
    fn one_of_empty_set_is_pass_through() {
        let value = FilterValue::OneOf(Vec::new());
        assert!(value.matches(FilterOp::EqualsOneOf, None));
        assert!(value.matches(FilterOp::EqualsOneOf, Some(&s("anything"))));
    }

    #[test]
    fn between_is_inclusive() {
        let value = FilterValue::range(10.0, 20.0);
        for (n, expected) in [(9, false), (10, true), (15, true), (20, true), (21, false)] {
            assert_eq!(
                value.matches(FilterOp::BetweenInclusive, Some(&FieldValue::from(n as i64))),
                expected,
                "value {}",
                n
            );
        }
    }

    #[test]
    fn between_excludes_non_numeric_and_missing() {
        let value = FilterValue::range(0.0, 100.0);
        assert!(!value.matches(FilterOp::BetweenInclusive, None));
        assert!(!value.matches(FilterOp::BetweenInclusive, Some(&s("50"))));
        assert!(!value.matches(FilterOp::BetweenInclusive, Some(&FieldValue::Null)));
        assert!(!value.matches(
            FilterOp::BetweenInclusive,
            Some(&FieldValue::from(f64::NAN))
        ));
    }

    #[test]
    fn shape_mismatch_never_matches() {
        let field = FieldValue::from(5i64);
        assert!(!FilterValue::text("5").matches(FilterOp::BetweenInclusive, Some(&field)));
        assert!(!FilterValue::range(0.0, 9.0).matches(FilterOp::Contains, Some(&field)));
        assert!(!FilterValue::range(0.0, 9.0).matches(FilterOp::EqualsOneOf, Some(&field)));
    }

    #[test]
    fn clause_resolves_dotted_paths() {
        let record = Record::new().with("stats", Record::new().with("columns", 10i64));
        let clause = Clause::new("stats.columns", FilterOp::BetweenInclusive, (0.0, 100.0));
        assert!(clause.matches(&record));
        let clause = Clause::new("stats.rows", FilterOp::BetweenInclusive, (0.0, 100.0));
        assert!(!clause.matches(&record));
    }

    #[test]
    fn filter_value_serde_shapes() {
        let text: FilterValue = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(text, FilterValue::text("abc"));
        let set: FilterValue = serde_json::from_str("[true, 3]").unwrap();
        assert_eq!(set, FilterValue::one_of([FieldValue::from(true), FieldValue::from(3i64)]));
        let range: FilterValue = serde_json::from_str(r#"{"min": 1, "max": 2.5}"#).unwrap();
        assert_eq!(range, FilterValue::range(1.0, 2.5));
    }
}
