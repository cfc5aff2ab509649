//! View-models for the explorer page.
//!
//! Each view is plain data derived from the page state, serializable for
//! machine output, with a `render` method producing terminal text:
//!
//! - [`TableView`]: the current page of filtered rows
//! - [`PreviewView`]: every field of one selected record
//! - [`ChartView`]: one bar per filtered record, the current row highlighted
//! - [`Message`]: loading, refreshing and error banners

mod chart;
mod column;
mod message;
mod preview;
mod table;

pub use chart::{Bar, ChartView};
pub use column::{CellContext, Column, RenderFn, ValueFn};
pub use message::{Message, MessageLevel};
pub use preview::{PreviewField, PreviewView};
pub use table::{row_id, Cell, TableRow, TableView};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cuts `s` to at most `max_width` terminal cells, ending with `…` when
/// shortened.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut current = 0;
    let limit = max_width - 1;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > limit {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    result
}

/// Truncates or pads `s` to exactly `width` cells.
pub(crate) fn fit(s: &str, width: usize, right: bool) -> String {
    let cut = truncate_to_width(s, width);
    let pad = width.saturating_sub(cut.width());
    if right {
        format!("{}{}", " ".repeat(pad), cut)
    } else {
        format!("{}{}", cut, " ".repeat(pad))
    }
}
