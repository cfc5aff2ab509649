//! Filter operators.
//!
//! The [`FilterOp`] enum is closed: every operator has exactly one
//! evaluation arm in [`FilterValue::matches`](crate::FilterValue::matches),
//! so adding an operator is checked by the compiler.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeekerError;

/// Operator declared by a filter config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOp {
    /// Case-insensitive substring match on the stringified field value.
    Contains,
    /// Field value must equal one of a set of accepted values.
    EqualsOneOf,
    /// Field value, as a number, must lie within `[min, max]`.
    BetweenInclusive,
}

impl FilterOp {
    /// All operators, in declaration order.
    pub const ALL: [FilterOp; 3] = [
        FilterOp::Contains,
        FilterOp::EqualsOneOf,
        FilterOp::BetweenInclusive,
    ];

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::EqualsOneOf => "equals-one-of",
            FilterOp::BetweenInclusive => "between-inclusive",
        }
    }

    /// Describes the value shape this operator takes.
    pub fn expected_value(self) -> &'static str {
        match self {
            FilterOp::Contains => "a text value",
            FilterOp::EqualsOneOf => "a set of values",
            FilterOp::BetweenInclusive => "a numeric range",
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| SeekerError::UnknownOperator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_display() {
        assert_eq!(FilterOp::Contains.to_string(), "contains");
        assert_eq!(FilterOp::EqualsOneOf.to_string(), "equals-one-of");
        assert_eq!(FilterOp::BetweenInclusive.to_string(), "between-inclusive");
    }

    #[test]
    fn op_from_str() {
        for op in FilterOp::ALL {
            assert_eq!(op.as_str().parse::<FilterOp>(), Ok(op));
        }
        assert_eq!(
            "regex".parse::<FilterOp>(),
            Err(SeekerError::UnknownOperator("regex".into()))
        );
    }

    #[test]
    fn op_serde_names() {
        let op: FilterOp = serde_json::from_str("\"between-inclusive\"").unwrap();
        assert_eq!(op, FilterOp::BetweenInclusive);
        assert_eq!(
            serde_json::to_string(&FilterOp::EqualsOneOf).unwrap(),
            "\"equals-one-of\""
        );
    }
}
