//! Declarative filter definitions.
//!
//! A [`FilterConfig`] describes one filterable dimension: the dotted path
//! it reads, its label, its operator and the control that edits it. The
//! control and its props are for the editing UI; the engine only reads
//! `field` and `operator`.

use serde::{Deserialize, Serialize};

use crate::clause::FilterValue;
use crate::error::{Result, SeekerError};
use crate::op::FilterOp;
use crate::path::FieldPath;
use crate::value::{FieldValue, Number};

/// Control used to edit a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterControl {
    /// Free text input.
    TextField,
    /// One checkbox per option.
    CheckboxList,
    /// Two-handle numeric slider.
    RangeSlider,
}

impl FilterControl {
    /// The control conventionally paired with an operator.
    pub fn for_op(op: FilterOp) -> Self {
        match op {
            FilterOp::Contains => FilterControl::TextField,
            FilterOp::EqualsOneOf => FilterControl::CheckboxList,
            FilterOp::BetweenInclusive => FilterControl::RangeSlider,
        }
    }
}

/// One selectable option of a checkbox list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: FieldValue,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Control configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterProps {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Describes one filterable field.
///
/// Deserializes from the camelCase layout used by page configs:
///
/// ```
/// use explorer_seeker::{FilterConfig, FilterOp};
///
/// let config: FilterConfig = serde_json::from_str(r#"{
///     "field": "stats.columns",
///     "label": "Number of Columns",
///     "operator": "between-inclusive",
///     "filterComponent": "RangeSlider",
///     "filterProps": { "min": 0, "max": 800 }
/// }"#).unwrap();
///
/// assert_eq!(config.operator, FilterOp::BetweenInclusive);
/// assert_eq!(config.props.max, Some(800.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Dotted path into a record.
    pub field: String,
    /// Display name.
    pub label: String,
    /// How the field is compared.
    pub operator: FilterOp,
    #[serde(
        rename = "filterComponent",
        alias = "control",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub control: Option<FilterControl>,
    #[serde(rename = "filterProps", alias = "props", default)]
    pub props: FilterProps,
}

impl FilterConfig {
    /// A `contains` filter edited with a text field.
    pub fn text(field: impl Into<String>, label: impl Into<String>) -> Self {
        FilterConfig {
            field: field.into(),
            label: label.into(),
            operator: FilterOp::Contains,
            control: Some(FilterControl::TextField),
            props: FilterProps::default(),
        }
    }

    /// An `equals-one-of` filter edited with a checkbox list.
    pub fn one_of(
        field: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = FilterOption>,
    ) -> Self {
        FilterConfig {
            field: field.into(),
            label: label.into(),
            operator: FilterOp::EqualsOneOf,
            control: Some(FilterControl::CheckboxList),
            props: FilterProps {
                options: options.into_iter().collect(),
                ..FilterProps::default()
            },
        }
    }

    /// A `between-inclusive` filter edited with a range slider.
    pub fn range(field: impl Into<String>, label: impl Into<String>, min: f64, max: f64) -> Self {
        FilterConfig {
            field: field.into(),
            label: label.into(),
            operator: FilterOp::BetweenInclusive,
            control: Some(FilterControl::RangeSlider),
            props: FilterProps {
                min: Some(min),
                max: Some(max),
                ..FilterProps::default()
            },
        }
    }

    /// The control editing this filter, inferred from the operator when
    /// the config does not name one.
    pub fn control(&self) -> FilterControl {
        self.control
            .unwrap_or_else(|| FilterControl::for_op(self.operator))
    }

    /// The parsed field path.
    pub fn path(&self) -> FieldPath {
        FieldPath::parse(&self.field)
    }

    /// Checks that `value` has the shape this filter's operator expects.
    pub fn accepts(&self, value: &FilterValue) -> Result<()> {
        match (self.operator, value) {
            (FilterOp::Contains, FilterValue::Text(_)) => Ok(()),
            (FilterOp::EqualsOneOf, FilterValue::OneOf(_)) => Ok(()),
            (FilterOp::BetweenInclusive, FilterValue::Range { min, max }) => {
                if min.is_nan() || max.is_nan() || min > max {
                    Err(SeekerError::InvalidRange {
                        field: self.field.clone(),
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            (op, _) => Err(SeekerError::ValueMismatch {
                field: self.field.clone(),
                op,
                expected: op.expected_value(),
            }),
        }
    }

    /// Parses command-line text into a value for this filter.
    ///
    /// - `contains`: the text itself.
    /// - `equals-one-of`: comma-separated option labels (case-insensitive)
    ///   or literal values (`true`, `42`, `name`).
    /// - `between-inclusive`: `min..max`; a missing bound falls back to the
    ///   slider's configured `min`/`max`.
    pub fn parse_value(&self, input: &str) -> Result<FilterValue> {
        let value = match self.operator {
            FilterOp::Contains => FilterValue::Text(input.to_string()),
            FilterOp::EqualsOneOf => FilterValue::OneOf(
                input
                    .split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(|token| self.option_value(token))
                    .collect(),
            ),
            FilterOp::BetweenInclusive => self.parse_range(input)?,
        };
        self.accepts(&value)?;
        Ok(value)
    }

    fn option_value(&self, token: &str) -> FieldValue {
        self.props
            .options
            .iter()
            .find(|option| option.label.eq_ignore_ascii_case(token))
            .map(|option| option.value.clone())
            .unwrap_or_else(|| literal(token))
    }

    fn parse_range(&self, input: &str) -> Result<FilterValue> {
        let (low, high) = input
            .split_once("..")
            .ok_or_else(|| self.invalid(input, "expected min..max"))?;
        let min = self.bound(input, low, self.props.min, "lower")?;
        let max = self.bound(input, high, self.props.max, "upper")?;
        Ok(FilterValue::Range { min, max })
    }

    fn bound(&self, input: &str, text: &str, fallback: Option<f64>, which: &str) -> Result<f64> {
        let text = text.trim();
        if text.is_empty() {
            return fallback
                .ok_or_else(|| self.invalid(input, &format!("no default {} bound", which)));
        }
        text.parse::<f64>()
            .map_err(|_| self.invalid(input, &format!("{} bound is not a number", which)))
    }

    fn invalid(&self, input: &str, reason: &str) -> SeekerError {
        SeekerError::InvalidInput {
            field: self.field.clone(),
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn literal(token: &str) -> FieldValue {
    match token {
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        _ => {
            if let Ok(n) = token.parse::<i64>() {
                FieldValue::Number(Number::I64(n))
            } else if let Ok(n) = token.parse::<f64>() {
                FieldValue::Number(Number::F64(n))
            } else {
                FieldValue::String(token.to_string())
            }
        }
    }
}

/// The filter registry: an ordered list of configs, looked up by field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterConfigs {
    configs: Vec<FilterConfig>,
}

impl FilterConfigs {
    pub fn new(configs: Vec<FilterConfig>) -> Self {
        FilterConfigs { configs }
    }

    /// Returns the config for `field`, if registered.
    pub fn get(&self, field: &str) -> Option<&FilterConfig> {
        self.configs.iter().find(|config| config.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterConfig> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn as_slice(&self) -> &[FilterConfig] {
        &self.configs
    }
}

impl From<Vec<FilterConfig>> for FilterConfigs {
    fn from(configs: Vec<FilterConfig>) -> Self {
        FilterConfigs::new(configs)
    }
}

impl FromIterator<FilterConfig> for FilterConfigs {
    fn from_iter<I: IntoIterator<Item = FilterConfig>>(iter: I) -> Self {
        FilterConfigs::new(iter.into_iter().collect())
    }
}
