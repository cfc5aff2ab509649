//! The list query adapter.
//!
//! [`ListQuery`] hides whether paging happens locally or remotely behind
//! one call, [`ListQuery::refresh`], and exposes the outcome as a
//! [`QuerySnapshot`].
//!
//! Every fetch is stamped with a generation number. When a fetch completes
//! after a newer one was started, its result is dropped, so the visible
//! data always belongs to the most recent request.

use std::sync::{Arc, Mutex, MutexGuard};

use explorer_seeker::{ActiveFilters, FilterConfigs, FilterQuery};
use tracing::{debug, warn};

use crate::error::Result;
use crate::pagination::{Pagination, QueryMode};
use crate::params::server_params;
use crate::source::{FetchRequest, RecordSet, RecordSource};
use crate::status::QuerySnapshot;

/// Everything a refresh depends on.
#[derive(Debug, Clone, Copy)]
pub struct QueryInput<'a> {
    pub active: &'a ActiveFilters,
    pub configs: &'a FilterConfigs,
    pub search: &'a str,
    pub pagination: Pagination,
}

#[derive(Debug, Default)]
struct State {
    snapshot: QuerySnapshot,
    generation: u64,
    loaded: Option<FetchRequest>,
}

/// Fetches records for a page of the explorer.
///
/// - Client mode loads the whole collection once. Page, filter and search
///   changes reuse the cached result; filtering and windowing happen
///   downstream.
/// - Server mode fetches one page per distinct combination of offset, page
///   size, filters and search.
///
/// Failures surface as an error snapshot; nothing is retried
/// automatically.
pub struct ListQuery {
    source: Arc<dyn RecordSource>,
    static_params: Vec<(String, String)>,
    state: Mutex<State>,
}

impl std::fmt::Debug for ListQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListQuery")
            .field("source", &self.source.describe())
            .field("static_params", &self.static_params)
            .finish_non_exhaustive()
    }
}

impl ListQuery {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        ListQuery {
            source,
            static_params: Vec::new(),
            state: Mutex::new(State::default()),
        }
    }

    /// Parameters sent with every request, in both modes.
    pub fn with_static_params(mut self, params: Vec<(String, String)>) -> Self {
        self.static_params = params;
        self
    }

    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.lock().snapshot.clone()
    }

    /// Makes the next refresh fetch even if the request is unchanged.
    pub fn invalidate(&self) {
        self.lock().loaded = None;
    }

    /// The request a refresh with `input` would issue.
    pub fn request_for(&self, input: &QueryInput<'_>) -> FetchRequest {
        match input.pagination.mode() {
            QueryMode::Client => FetchRequest::whole(self.static_params.clone()),
            QueryMode::Server => FetchRequest::page(
                input.pagination.offset(),
                input.pagination.page_size(),
                server_params(input.active, input.configs, input.search, &self.static_params),
            )
            .with_filter(FilterQuery::compile(
                input.active,
                input.configs,
                input.search,
            )),
        }
    }

    /// Brings the snapshot up to date with `input`, fetching if needed.
    ///
    /// Returns the snapshot after this call's fetch was applied or
    /// discarded.
    pub async fn refresh(&self, input: &QueryInput<'_>) -> QuerySnapshot {
        let request = self.request_for(input);
        let Some(generation) = self.begin(&request) else {
            debug!(source = %self.source.describe(), "serving cached records");
            return self.snapshot();
        };

        debug!(
            source = %self.source.describe(),
            mode = %request.mode,
            offset = request.offset,
            generation,
            "fetching records"
        );
        let result = self.source.fetch(&request).await;
        self.finish(generation, request, result)
    }

    // A cache hit is a request too: it takes a generation so that any fetch
    // still in flight is discarded when it lands.
    fn begin(&self, request: &FetchRequest) -> Option<u64> {
        let mut state = self.lock();
        state.generation += 1;
        if state.snapshot.is_success() && state.loaded.as_ref() == Some(request) {
            state.snapshot.settle();
            return None;
        }
        state.snapshot.start_fetch();
        Some(state.generation)
    }

    fn finish(
        &self,
        generation: u64,
        request: FetchRequest,
        result: Result<RecordSet>,
    ) -> QuerySnapshot {
        let mut state = self.lock();
        if generation != state.generation {
            debug!(
                generation,
                latest = state.generation,
                "discarding stale response"
            );
            return state.snapshot.clone();
        }
        match result {
            Ok(set) => {
                debug!(rows = set.records.len(), total = ?set.total, "records loaded");
                state.loaded = Some(request);
                state.snapshot.resolve(Ok(set));
            }
            Err(err) => {
                warn!(source = %self.source.describe(), error = %err, "fetch failed");
                state.loaded = None;
                state.snapshot.resolve(Err(err.to_string()));
            }
        }
        state.snapshot.clone()
    }

    // The lock is never held across an await, so a poisoned mutex only
    // means a panic elsewhere; the state itself is still consistent.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use explorer_seeker::{FilterConfig, FilterValue, Record};

    fn numbered(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new().with("id", i as u64))
            .collect()
    }

    #[test]
    fn client_requests_ignore_paging_and_filters() {
        let query = ListQuery::new(Arc::new(StaticSource::new("n", numbered(3))))
            .with_static_params(vec![("project".into(), "mp".into())]);
        let configs: FilterConfigs = vec![FilterConfig::text("title", "Title")].into();
        let active = ActiveFilters::new().with("title", "x");
        let mut pagination = Pagination::new(QueryMode::Client);
        pagination.set_page(4);
        let input = QueryInput {
            active: &active,
            configs: &configs,
            search: "abc",
            pagination,
        };
        assert_eq!(
            query.request_for(&input),
            FetchRequest::whole(vec![("project".into(), "mp".into())])
        );
    }

    #[test]
    fn server_requests_carry_offset_and_filters() {
        let query = ListQuery::new(Arc::new(StaticSource::new("n", numbered(3))));
        let configs: FilterConfigs = vec![FilterConfig::range("n", "N", 0.0, 9.0)].into();
        let active = ActiveFilters::new().with("n", FilterValue::range(1.0, 2.0));
        let mut pagination = Pagination::new(QueryMode::Server).with_page_size(10);
        pagination.set_page(2);
        let request = query.request_for(&QueryInput {
            active: &active,
            configs: &configs,
            search: "",
            pagination,
        });
        assert_eq!(request.offset, 20);
        assert_eq!(request.limit, Some(10));
        assert_eq!(request.params.len(), 2);
        assert_eq!(request.filter.clauses().len(), 1);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let query = ListQuery::new(Arc::new(StaticSource::new("n", Vec::new())));
        let first = query.begin(&FetchRequest::page(0, 1, Vec::new())).unwrap();
        let second = query.begin(&FetchRequest::page(1, 1, Vec::new())).unwrap();

        let snapshot = query.finish(
            second,
            FetchRequest::page(1, 1, Vec::new()),
            Ok(RecordSet::new(numbered(1))),
        );
        assert!(snapshot.is_success());

        let snapshot = query.finish(
            first,
            FetchRequest::page(0, 1, Vec::new()),
            Ok(RecordSet::new(numbered(5))),
        );
        assert_eq!(snapshot.records().len(), 1);
    }

    #[test]
    fn cache_hit_supersedes_fetch_in_flight() {
        let query = ListQuery::new(Arc::new(StaticSource::new("n", Vec::new())));
        let cached = FetchRequest::page(0, 1, Vec::new());
        let first = query.begin(&cached).unwrap();
        query.finish(first, cached.clone(), Ok(RecordSet::new(numbered(1))));

        let other = query.begin(&FetchRequest::page(1, 1, Vec::new())).unwrap();
        assert!(query.snapshot().is_fetching);
        assert_eq!(query.begin(&cached), None);
        assert!(!query.snapshot().is_fetching);

        let snapshot = query.finish(
            other,
            FetchRequest::page(1, 1, Vec::new()),
            Ok(RecordSet::new(numbered(3))),
        );
        assert_eq!(snapshot.records().len(), 1);
        assert_eq!(query.snapshot().records().len(), 1);
    }
}
