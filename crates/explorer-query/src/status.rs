//! Query status snapshots.

use std::sync::Arc;

use explorer_seeker::Record;

use crate::source::RecordSet;

/// Lifecycle status of a list query.
///
/// `Pending` holds until the first fetch resolves; afterwards the status is
/// `Success` or `Error` according to the latest applied fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Pending,
    Success,
    Error,
}

/// What consumers see of a query at one moment.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    /// A fetch is outstanding. After a first success this means stale data
    /// is on screen while a newer result loads.
    pub is_fetching: bool,
    /// Last successfully loaded data; kept across later failures.
    pub data: Option<Arc<RecordSet>>,
    /// Message of the latest failure while in `Error`.
    pub error: Option<String>,
}

impl Default for QuerySnapshot {
    fn default() -> Self {
        QuerySnapshot::pending()
    }
}

impl QuerySnapshot {
    /// Initial snapshot: nothing loaded yet.
    pub fn pending() -> Self {
        QuerySnapshot {
            status: QueryStatus::Pending,
            is_fetching: false,
            data: None,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// Loaded records, or an empty slice.
    pub fn records(&self) -> &[Record] {
        self.data
            .as_deref()
            .map(|set| set.records.as_slice())
            .unwrap_or(&[])
    }

    /// Total reported by the source, or the number of loaded records.
    pub fn total(&self) -> usize {
        self.data.as_deref().map(RecordSet::total_or_len).unwrap_or(0)
    }

    pub(crate) fn start_fetch(&mut self) {
        self.is_fetching = true;
    }

    /// The latest request was answered without a fetch.
    pub(crate) fn settle(&mut self) {
        self.is_fetching = false;
    }

    pub(crate) fn resolve(&mut self, result: Result<RecordSet, String>) {
        self.is_fetching = false;
        match result {
            Ok(set) => {
                self.status = QueryStatus::Success;
                self.data = Some(Arc::new(set));
                self.error = None;
            }
            Err(message) => {
                self.status = QueryStatus::Error;
                self.error = Some(message);
            }
        }
    }
}
