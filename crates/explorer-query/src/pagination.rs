//! Pagination cursor and query mode.

use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Where filtering and paging happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Whole collection loaded once; filter and page locally.
    #[default]
    Client,
    /// Each page and filter change fetches one page from the source.
    Server,
}

impl QueryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryMode::Client => "client",
            QueryMode::Server => "server",
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(QueryMode::Client),
            "server" => Ok(QueryMode::Server),
            other => Err(format!("unknown query mode '{}'", other)),
        }
    }
}

/// The page/page-size pair a table pager reports on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationModel {
    pub page: usize,
    pub page_size: usize,
}

/// Pagination cursor.
///
/// `offset` is derived and always equals `page * page_size`. Changing the
/// page size resets the page to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    offset: usize,
    mode: QueryMode,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(QueryMode::default())
    }
}

impl Pagination {
    /// First page with the default page size.
    pub fn new(mode: QueryMode) -> Self {
        Pagination {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
            mode,
        }
    }

    /// Sets the initial page size, builder style.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// The current state as a pager model.
    pub fn model(&self) -> PaginationModel {
        PaginationModel {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Moves to `page`. Returns `true` if the cursor changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page == self.page {
            return false;
        }
        self.page = page;
        self.recompute();
        true
    }

    /// Changes the page size and resets to the first page.
    ///
    /// A size of 0 is treated as 1. Returns `true` if the cursor changed.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page = 0;
        self.recompute();
        true
    }

    /// Applies a combined pager change. The requested page is honoured
    /// only when the page size is unchanged.
    pub fn apply(&mut self, model: PaginationModel) -> bool {
        if model.page_size.max(1) != self.page_size {
            self.set_page_size(model.page_size)
        } else {
            self.set_page(model.page)
        }
    }

    /// Returns to the first page.
    pub fn reset_page(&mut self) -> bool {
        self.set_page(0)
    }

    /// Slice range of the current page over `len` rows, clamped.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = self.offset.saturating_add(self.page_size).min(len);
        start..end
    }

    /// Number of pages needed for `total` rows (at least one).
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    fn recompute(&mut self) {
        self.offset = self.page * self.page_size;
    }
}
