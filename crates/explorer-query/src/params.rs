//! Translation of active filters into server query parameters.
//!
//! Dotted paths become `__`-joined keys and each operator gets a suffix:
//!
//! | Operator | Parameters |
//! |----------|------------|
//! | `contains` | `<key>__contains=<text>` |
//! | `equals-one-of` | `<key>__in=<a>,<b>` |
//! | `between-inclusive` | `<key>__gte=<min>`, `<key>__lte=<max>` |
//!
//! The search term is sent as `_search`. Static params come last.

use explorer_seeker::{ActiveFilters, FilterConfigs, FilterOp, FilterValue, Number};
use tracing::debug;

/// Query parameter carrying the free-text search term.
pub const SEARCH_PARAM: &str = "_search";

/// Builds the parameter list for a server-mode fetch.
pub fn server_params(
    active: &ActiveFilters,
    configs: &FilterConfigs,
    search: &str,
    static_params: &[(String, String)],
) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for (field, value) in active.iter() {
        let Some(config) = configs.get(field) else {
            debug!(field, "not sending filter without a config");
            continue;
        };
        let key = param_key(field);
        match (config.operator, value) {
            (FilterOp::Contains, FilterValue::Text(text)) => {
                params.push((format!("{}__contains", key), text.clone()));
            }
            (FilterOp::EqualsOneOf, FilterValue::OneOf(values)) => {
                let joined = values
                    .iter()
                    .filter_map(|v| v.display())
                    .collect::<Vec<_>>()
                    .join(",");
                params.push((format!("{}__in", key), joined));
            }
            (FilterOp::BetweenInclusive, FilterValue::Range { min, max }) => {
                params.push((format!("{}__gte", key), Number::F64(*min).to_string()));
                params.push((format!("{}__lte", key), Number::F64(*max).to_string()));
            }
            (op, value) => {
                debug!(field, %op, shape = value.shape(), "not sending mismatched filter");
            }
        }
    }
    if !search.is_empty() {
        params.push((SEARCH_PARAM.to_string(), search.to_string()));
    }
    params.extend(static_params.iter().cloned());
    params
}

/// `stats.columns` -> `stats__columns`.
pub fn param_key(field: &str) -> String {
    field.replace('.', "__")
}
