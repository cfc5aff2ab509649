//! The paginated table.

use explorer_query::{Pagination, QueryMode};
use explorer_seeker::{FieldPath, Record};
use serde::Serialize;

use super::column::{CellContext, Column};
use super::fit;

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Hovering this cell opens a chart.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub chart: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<Cell>,
}

/// The visible page of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    #[serde(skip)]
    pub widths: Vec<usize>,
    #[serde(skip)]
    pub right_aligned: Vec<bool>,
    pub rows: Vec<TableRow>,
    /// Rows on all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub mode: QueryMode,
    /// 1-based index of the first visible row; 0 when empty.
    pub first: usize,
    /// 1-based index of the last visible row.
    pub last: usize,
}

/// Identifier for a row: the id field when it holds a scalar, otherwise
/// the row's position in the filtered set.
pub fn row_id(record: &Record, id_field: &FieldPath, position: usize) -> String {
    id_field
        .resolve(record)
        .and_then(|v| v.display())
        .unwrap_or_else(|| position.to_string())
}

impl TableView {
    /// Builds the table for `rows`, the records that passed the filters.
    ///
    /// In client mode `rows` is the whole filtered collection and is cut
    /// to the current page here. In server mode `rows` is already one page
    /// and `source_total` is the size of the remote collection.
    pub fn build(
        rows: &[&Record],
        columns: &[Column],
        pagination: &Pagination,
        id_field: &FieldPath,
        source_total: Option<usize>,
    ) -> TableView {
        let (visible, total, base) = match pagination.mode() {
            QueryMode::Client => {
                let window = pagination.window(rows.len());
                let base = window.start;
                (&rows[window], rows.len(), base)
            }
            QueryMode::Server => {
                let base = pagination.offset();
                let total = source_total.unwrap_or(base + rows.len());
                (rows, total, base)
            }
        };

        let table_rows = visible
            .iter()
            .enumerate()
            .map(|(i, &record)| {
                let ctx = CellContext { record, rows };
                let cells = columns
                    .iter()
                    .map(|column| {
                        let value = column.value(record);
                        Cell {
                            text: column.render(&value, &ctx),
                            link: column.link_for(&value),
                            chart: column.chart,
                        }
                    })
                    .collect();
                TableRow {
                    id: row_id(record, id_field, base + i),
                    cells,
                }
            })
            .collect::<Vec<_>>();

        let (first, last) = if table_rows.is_empty() {
            (0, 0)
        } else {
            (base + 1, base + table_rows.len())
        };

        TableView {
            headers: columns.iter().map(|c| c.header.clone()).collect(),
            widths: columns.iter().map(|c| c.width).collect(),
            right_aligned: columns.iter().map(Column::right_aligned).collect(),
            rows: table_rows,
            total,
            page: pagination.page(),
            page_size: pagination.page_size(),
            page_count: pagination.page_count(total),
            mode: pagination.mode(),
            first,
            last,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Footer text, e.g. `showing 26-50 of 120 (page 2/5)`.
    pub fn summary(&self) -> String {
        if self.rows.is_empty() {
            return "no matching records".to_string();
        }
        format!(
            "showing {}-{} of {} (page {}/{})",
            self.first,
            self.last,
            self.total,
            self.page + 1,
            self.page_count
        )
    }

    /// Aligned text table with a header rule and summary footer.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string();

        out.push_str(&line(
            self.headers
                .iter()
                .zip(&self.widths)
                .zip(&self.right_aligned)
                .map(|((h, w), r)| fit(h, *w, *r))
                .collect(),
        ));
        out.push('\n');
        out.push_str(&line(self.widths.iter().map(|w| "─".repeat(*w)).collect()));
        out.push('\n');

        for row in &self.rows {
            out.push_str(&line(
                row.cells
                    .iter()
                    .zip(&self.widths)
                    .zip(&self.right_aligned)
                    .map(|((c, w), r)| fit(&c.text, *w, *r))
                    .collect(),
            ));
            out.push('\n');
        }
        out.push_str(&self.summary());
        out.push('\n');
        out
    }
}
