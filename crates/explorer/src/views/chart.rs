//! The hover chart shown for a chart cell.
//!
//! One bar per filtered record, labelled by the title field and sized by
//! the chart column's value. The bar of the row that opened the chart is
//! highlighted; hovering another bar marks it separately. Hover state is
//! display-only and never touches the page data.

use explorer_seeker::{FieldPath, FieldValue, Record};
use serde::Serialize;

use super::fit;

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// The record had no numeric value; drawn as zero.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
    /// The bar belongs to the current row.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: String,
    pub bars: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovered: Option<usize>,
}

impl ChartView {
    pub fn build(
        title: impl Into<String>,
        rows: &[&Record],
        current: &Record,
        label: &FieldPath,
        value: &FieldPath,
    ) -> ChartView {
        let label_of = |record: &Record| {
            label
                .resolve(record)
                .and_then(FieldValue::display)
                .unwrap_or_default()
        };
        let current_label = label_of(current);

        let bars = rows
            .iter()
            .map(|&record| {
                let number = value
                    .resolve(record)
                    .and_then(FieldValue::as_number)
                    .map(|n| n.to_f64())
                    .filter(|n| n.is_finite());
                let label = label_of(record);
                Bar {
                    highlighted: label == current_label,
                    label,
                    value: number.unwrap_or(0.0),
                    missing: number.is_none(),
                }
            })
            .collect();

        ChartView {
            title: title.into(),
            bars,
            hovered: None,
        }
    }

    /// Marks the bar under the pointer. Out-of-range indexes clear it.
    pub fn hover(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|i| *i < self.bars.len());
    }

    pub fn highlighted(&self) -> impl Iterator<Item = (usize, &Bar)> {
        self.bars.iter().enumerate().filter(|(_, b)| b.highlighted)
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }

    /// Horizontal bar chart, `width` cells for the longest bar.
    ///
    /// The current row's bar uses `▓` and is marked `*`; a hovered bar is
    /// marked `>`.
    pub fn render(&self, width: usize) -> String {
        let label_width = self
            .bars
            .iter()
            .map(|b| unicode_width::UnicodeWidthStr::width(b.label.as_str()))
            .max()
            .unwrap_or(0)
            .min(30);
        let max = self.max_value();

        let mut out = format!("{}\n", self.title);
        for (i, bar) in self.bars.iter().enumerate() {
            let marker = if bar.highlighted {
                '*'
            } else if self.hovered == Some(i) {
                '>'
            } else {
                ' '
            };
            let len = if max > 0.0 {
                ((bar.value / max) * width as f64).round() as usize
            } else {
                0
            };
            let fill = if bar.highlighted { "▓" } else { "█" };
            let shown = if bar.missing {
                "n/a".to_string()
            } else {
                FieldValue::from(bar.value).to_string()
            };
            out.push_str(&format!(
                "{marker} {} │{} {shown}\n",
                fit(&bar.label, label_width, false),
                fill.repeat(len)
            ));
        }
        out
    }
}
