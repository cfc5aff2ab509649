//! Property-based tests for the filter engine using proptest.

use proptest::prelude::*;
use explorer_seeker::{
    filter_data, ActiveFilters, FieldValue, FilterConfig, FilterConfigs, FilterOp, FilterOption,
    FilterQuery, FilterValue, Record,
};

// ============================================================================
// Test helpers
// ============================================================================

fn configs() -> FilterConfigs {
    vec![
        FilterConfig::text("title", "Title"),
        FilterConfig::one_of(
            "is_public",
            "Public",
            [
                FilterOption::new("Public", true),
                FilterOption::new("Private", false),
            ],
        ),
        FilterConfig::range("stats.columns", "Columns", 0.0, 800.0),
    ]
    .into()
}

// Records with an optional nested numeric field so that missing paths show up.
fn record_strategy() -> impl Strategy<Value = Record> {
    (
        "[a-zA-Z]{1,8}",
        any::<bool>(),
        proptest::option::of(0i64..1000),
    )
        .prop_map(|(title, public, columns)| {
            let stats = match columns {
                Some(n) => Record::new().with("columns", n),
                None => Record::new(),
            };
            Record::new()
                .with("title", title)
                .with("is_public", public)
                .with("stats", stats)
        })
}

fn filter_strategy() -> impl Strategy<Value = (String, FilterValue)> {
    prop_oneof![
        "[a-z]{0,2}".prop_map(|s| ("title".to_string(), FilterValue::text(s))),
        proptest::collection::vec(any::<bool>(), 0..3)
            .prop_map(|v| ("is_public".to_string(), FilterValue::one_of(v))),
        (0i64..1000, 0i64..1000).prop_map(|(a, b)| {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            (
                "stats.columns".to_string(),
                FilterValue::range(min as f64, max as f64),
            )
        }),
    ]
}

fn positions(records: &[Record], results: &[&Record]) -> Vec<usize> {
    results
        .iter()
        .filter_map(|r| records.iter().position(|candidate| std::ptr::eq(candidate, *r)))
        .collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// No filters and no search returns the input unchanged.
    #[test]
    fn empty_filters_are_identity(records in prop::collection::vec(record_strategy(), 0..40)) {
        let results = filter_data(&records, &ActiveFilters::new(), &configs(), "");
        prop_assert_eq!(positions(&records, &results), (0..records.len()).collect::<Vec<_>>());
    }

    /// Filtering never grows the collection and never reorders it.
    #[test]
    fn output_is_an_ordered_subsequence(
        records in prop::collection::vec(record_strategy(), 0..40),
        (field, value) in filter_strategy(),
        search in "[a-z]{0,2}",
    ) {
        let active = ActiveFilters::new().with(field, value);
        let results = filter_data(&records, &active, &configs(), &search);
        let idx = positions(&records, &results);
        prop_assert_eq!(idx.len(), results.len());
        prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    /// Two filters together select exactly the intersection of each alone.
    #[test]
    fn filters_are_conjunctive(
        records in prop::collection::vec(record_strategy(), 0..40),
        (f1, v1) in filter_strategy(),
        (f2, v2) in filter_strategy(),
    ) {
        prop_assume!(f1 != f2);
        let cfg = configs();
        let one = ActiveFilters::new().with(f1.clone(), v1.clone());
        let two = ActiveFilters::new().with(f2.clone(), v2.clone());
        let both = ActiveFilters::new().with(f1, v1).with(f2, v2);

        let a = positions(&records, &filter_data(&records, &one, &cfg, ""));
        let b = positions(&records, &filter_data(&records, &two, &cfg, ""));
        let ab = positions(&records, &filter_data(&records, &both, &cfg, ""));

        let expected: Vec<usize> = a.into_iter().filter(|i| b.contains(i)).collect();
        prop_assert_eq!(ab, expected);
    }

    /// Search is ANDed with filters.
    #[test]
    fn search_narrows_filter_result(
        records in prop::collection::vec(record_strategy(), 0..40),
        (field, value) in filter_strategy(),
        search in "[a-z]{1,2}",
    ) {
        let active = ActiveFilters::new().with(field, value);
        let filtered = positions(&records, &filter_data(&records, &active, &configs(), ""));
        let searched = positions(&records, &filter_data(&records, &active, &configs(), &search));
        prop_assert!(searched.iter().all(|i| filtered.contains(i)));
    }

    /// Range bounds are inclusive and everything just outside is excluded.
    #[test]
    fn range_bounds_are_inclusive(min in -1000i64..1000, width in 0i64..100) {
        let max = min + width;
        let records: Vec<Record> = [min - 1, min, max, max + 1]
            .into_iter()
            .map(|n| Record::new().with("stats", Record::new().with("columns", n)))
            .collect();
        let active = ActiveFilters::new()
            .with("stats.columns", FilterValue::range(min as f64, max as f64));
        let idx = positions(&records, &filter_data(&records, &active, &configs(), ""));
        prop_assert_eq!(idx, vec![1, 2]);
    }

    /// Arbitrary paths never panic, whatever the record holds.
    #[test]
    fn arbitrary_paths_never_panic(
        records in prop::collection::vec(record_strategy(), 0..10),
        path in "[a-z.]{0,12}",
        text in "[a-z]{0,3}",
    ) {
        let cfg: FilterConfigs = vec![
            FilterConfig::text(path.clone(), "p"),
        ].into();
        let active = ActiveFilters::new().with(path.clone(), text);
        let _ = filter_data(&records, &active, &cfg, "x");
        for record in &records {
            let _ = record.resolve(&path);
        }
    }

    /// An empty accepted set is a no-op.
    #[test]
    fn empty_set_passes_everything(records in prop::collection::vec(record_strategy(), 0..40)) {
        let query = FilterQuery::new()
            .clause("is_public", FilterOp::EqualsOneOf, Vec::<FieldValue>::new());
        prop_assert_eq!(query.count(&records), records.len());
    }
}
