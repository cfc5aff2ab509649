//! The explorer page controller.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use explorer_query::{
    DataSource, ListQuery, Pagination, PaginationModel, QueryInput, QueryMode, QuerySnapshot,
    RecordSource,
};
use explorer_seeker::{filter_data, ActiveFilters, FieldPath, FilterConfigs, FilterValue, Record};
use tracing::debug;

use crate::config::PageConfig;
use crate::error::{ExplorerError, Result};
use crate::store::{FilterStore, Subscription};
use crate::views::{row_id, ChartView, Column, Message, PreviewView, TableView};

/// One explorer page: filters, search, pagination, fetched data and the
/// selected preview record.
///
/// The page subscribes to its own [`FilterStore`], so a filter change made
/// through any clone of the store moves the table back to the first page
/// and, in server mode, marks the data for reloading.
pub struct ExplorerPage {
    title: String,
    description: Option<String>,
    id_field: FieldPath,
    title_field: FieldPath,
    configs: FilterConfigs,
    columns: Vec<Column>,
    store: FilterStore,
    subscription: Option<Subscription>,
    pagination: Rc<Cell<Pagination>>,
    stale: Rc<Cell<bool>>,
    search: String,
    preview: Option<Record>,
    query: ListQuery,
}

impl std::fmt::Debug for ExplorerPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerPage")
            .field("title", &self.title)
            .field("filters", &self.store)
            .field("search", &self.search)
            .field("pagination", &self.pagination.get())
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl ExplorerPage {
    /// Builds a page reading from `source`.
    pub fn new(config: &PageConfig, source: Arc<dyn RecordSource>) -> Self {
        let pagination = Rc::new(Cell::new(
            Pagination::new(config.query_mode).with_page_size(config.page_size),
        ));
        let stale = Rc::new(Cell::new(true));
        let store = FilterStore::new();

        let subscription = store.subscribe({
            let pagination = pagination.clone();
            let stale = stale.clone();
            move |filters: &ActiveFilters| {
                let mut current = pagination.get();
                current.reset_page();
                pagination.set(current);
                if current.mode() == QueryMode::Server {
                    stale.set(true);
                }
                debug!(active = filters.len(), "filters changed, back to first page");
            }
        });

        ExplorerPage {
            title: config.title.clone(),
            description: config.description.clone(),
            id_field: FieldPath::parse(&config.id_field),
            title_field: FieldPath::parse(&config.title_field),
            configs: config.filters.clone(),
            columns: config.columns().iter().map(Column::from_config).collect(),
            store,
            subscription: Some(subscription),
            pagination,
            stale,
            search: String::new(),
            preview: None,
            query: ListQuery::new(source).with_static_params(config.static_params()),
        }
    }

    /// Builds a page reading from the config's `data_source`.
    pub fn open(config: &PageConfig) -> Result<Self> {
        let source = DataSource::parse(&config.data_source)?.open()?;
        Ok(Self::new(config, source))
    }

    /// Replaces the configured columns, e.g. with custom getters or
    /// renderers.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn configs(&self) -> &FilterConfigs {
        &self.configs
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The store filter controls write to.
    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn filters(&self) -> ActiveFilters {
        self.store.get()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination.get()
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        self.query.snapshot()
    }

    /// Whether state changed since the last load in a way that needs new
    /// data.
    pub fn needs_load(&self) -> bool {
        self.stale.get()
    }

    /// Fetches data for the current state. In client mode this only
    /// fetches the first time.
    pub async fn load(&self) -> QuerySnapshot {
        self.stale.set(false);
        let active = self.store.get();
        let input = QueryInput {
            active: &active,
            configs: &self.configs,
            search: &self.search,
            pagination: self.pagination.get(),
        };
        self.query.refresh(&input).await
    }

    /// Drops cached data and fetches again.
    pub async fn reload(&self) -> QuerySnapshot {
        self.query.invalidate();
        self.load().await
    }

    /// Sets the free-text search. A new term returns to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        debug!(search = %term, "search changed");
        self.search = term;
        self.update_pagination(Pagination::reset_page);
        if self.pagination.get().mode() == QueryMode::Server {
            self.stale.set(true);
        }
        true
    }

    /// Sets an active filter after checking it against its config. An
    /// empty value removes the filter.
    pub fn set_filter(&self, field: &str, value: impl Into<FilterValue>) -> Result<bool> {
        let config = self
            .configs
            .get(field)
            .ok_or_else(|| ExplorerError::UnknownFilter(field.to_string()))?;
        let value = value.into();
        if !value.is_empty() {
            config.accepts(&value)?;
        }
        Ok(self.store.set_filter(field, value))
    }

    /// Parses `input` the way the filter's control would, then sets it.
    pub fn set_filter_input(&self, field: &str, input: &str) -> Result<bool> {
        let config = self
            .configs
            .get(field)
            .ok_or_else(|| ExplorerError::UnknownFilter(field.to_string()))?;
        let value = config.parse_value(input)?;
        Ok(self.store.set_filter(field, value))
    }

    pub fn remove_filter(&self, field: &str) -> bool {
        self.store.remove_filter(field)
    }

    pub fn clear_filters(&self) -> bool {
        self.store.clear_all()
    }

    /// Applies a pager change. A new page size returns to the first page.
    pub fn set_pagination(&self, model: PaginationModel) -> bool {
        self.update_pagination(|p| p.apply(model))
    }

    fn update_pagination(&self, change: impl FnOnce(&mut Pagination) -> bool) -> bool {
        let mut current = self.pagination.get();
        let changed = change(&mut current);
        self.pagination.set(current);
        if changed && current.mode() == QueryMode::Server {
            self.stale.set(true);
        }
        changed
    }

    /// Runs `f` over the loaded records that pass the filters and search,
    /// with the position of the first one in the whole result.
    fn with_rows<R>(&self, f: impl FnOnce(&[&Record], Option<usize>) -> R) -> R {
        let snapshot = self.query.snapshot();
        let rows = self
            .store
            .with(|active| filter_data(snapshot.records(), active, &self.configs, &self.search));
        f(&rows, snapshot.data.as_ref().and_then(|d| d.total))
    }

    /// The loaded records that pass the filters and search, in order.
    pub fn rows(&self) -> Vec<Record> {
        self.with_rows(|rows, _| rows.iter().map(|&r| r.clone()).collect())
    }

    pub fn table(&self) -> TableView {
        let pagination = self.pagination.get();
        self.with_rows(|rows, total| {
            TableView::build(rows, &self.columns, &pagination, &self.id_field, total)
        })
    }

    fn find_row<'r>(&self, rows: &[&'r Record], id: &str) -> Option<&'r Record> {
        let pagination = self.pagination.get();
        let base = match pagination.mode() {
            QueryMode::Client => 0,
            QueryMode::Server => pagination.offset(),
        };
        rows.iter()
            .enumerate()
            .find(|(i, record)| row_id(record, &self.id_field, base + i) == id)
            .map(|(_, &record)| record)
    }

    /// Opens the preview for the row with this id.
    pub fn select_row(&mut self, id: &str) -> Result<&Record> {
        let found = self
            .with_rows(|rows, _| self.find_row(rows, id).cloned())
            .ok_or_else(|| ExplorerError::UnknownRow(id.to_string()))?;
        debug!(id, "preview opened");
        Ok(&*self.preview.insert(found))
    }

    /// Closes the preview. Returns whether one was open.
    pub fn close_preview(&mut self) -> bool {
        self.preview.take().is_some()
    }

    pub fn preview_record(&self) -> Option<&Record> {
        self.preview.as_ref()
    }

    pub fn preview(&self) -> Option<PreviewView> {
        self.preview
            .as_ref()
            .map(|record| PreviewView::new(record, &self.id_field, &self.title_field))
    }

    /// The chart for the row with this id, over every filtered row.
    pub fn chart_for(&self, id: &str) -> Result<ChartView> {
        let column = self
            .columns
            .iter()
            .find(|c| c.chart)
            .ok_or(ExplorerError::NoChartColumn)?;
        self.with_rows(|rows, _| -> Result<ChartView> {
            let current = self
                .find_row(rows, id)
                .ok_or_else(|| ExplorerError::UnknownRow(id.to_string()))?;
            Ok(ChartView::build(
                column.header.clone(),
                rows,
                current,
                &self.title_field,
                &column.path,
            ))
        })
    }

    /// Banners for the current state: loading, refreshing, failure or an
    /// empty result.
    pub fn status_messages(&self) -> Vec<Message> {
        let snapshot = self.query.snapshot();
        let mut messages = Vec::new();
        if snapshot.is_pending() {
            messages.push(Message::info(format!(
                "loading records from {}",
                self.query.source().describe()
            )));
        } else if snapshot.is_error() {
            let text = snapshot.error.as_deref().unwrap_or("failed to load records");
            messages.push(Message::error(text));
        } else if snapshot.is_fetching {
            messages.push(Message::info("refreshing"));
        }

        if snapshot.is_success() && !snapshot.records().is_empty() && self.rows().is_empty() {
            messages.push(Message::warning("no records match the current filters"));
        }
        messages
    }
}

impl Drop for ExplorerPage {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
