//! The record preview panel.

use explorer_seeker::{FieldPath, FieldValue, Record};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::table::row_id;

/// One line of the preview: a dotted path and its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewField {
    pub path: String,
    pub value: String,
}

/// Every field of the selected record, nested records flattened to dotted
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub id: String,
    pub title: String,
    pub fields: Vec<PreviewField>,
}

impl PreviewView {
    pub fn new(record: &Record, id_field: &FieldPath, title_field: &FieldPath) -> Self {
        let id = row_id(record, id_field, 0);
        let title = title_field
            .resolve(record)
            .and_then(FieldValue::display)
            .unwrap_or_else(|| id.clone());
        let mut fields = Vec::new();
        flatten(record, "", &mut fields);
        PreviewView { id, title, fields }
    }

    /// Looks up a flattened field.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.value.as_str())
    }

    pub fn render(&self) -> String {
        let key_width = self.fields.iter().map(|f| f.path.width()).max().unwrap_or(0);
        let mut out = format!("{}\n{}\n", self.title, "═".repeat(self.title.width().max(1)));
        for field in &self.fields {
            let pad = key_width - field.path.width();
            out.push_str(&format!(
                "{}{}  {}\n",
                field.path,
                " ".repeat(pad),
                field.value
            ));
        }
        out
    }
}

fn flatten(record: &Record, prefix: &str, out: &mut Vec<PreviewField>) {
    for (key, value) in record.iter() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            FieldValue::Nested(inner) if !inner.is_empty() => flatten(inner, &path, out),
            FieldValue::Nested(_) => out.push(PreviewField {
                path,
                value: "{}".to_string(),
            }),
            other => out.push(PreviewField {
                path,
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Record {
        Record::new()
            .with("id", "mp-42")
            .with("title", "Alpha")
            .with(
                "authors",
                FieldValue::List(vec![FieldValue::from("ada"), FieldValue::from("alan")]),
            )
            .with(
                "stats",
                Record::new()
                    .with("columns", 10)
                    .with("tables", Record::new().with("number", 3)),
            )
            .with("meta", Record::new())
    }

    #[test]
    fn flattens_nested_fields() {
        let view = PreviewView::new(&project(), &"id".into(), &"title".into());
        assert_eq!(view.title, "Alpha");
        assert_eq!(view.id, "mp-42");
        assert_eq!(view.get("stats.columns"), Some("10"));
        assert_eq!(view.get("stats.tables.number"), Some("3"));
        assert_eq!(view.get("authors"), Some("ada, alan"));
        assert_eq!(view.get("meta"), Some("{}"));
        assert_eq!(view.get("stats"), None);
    }

    #[test]
    fn title_falls_back_to_id() {
        let record = Record::new().with("id", 7);
        let view = PreviewView::new(&record, &"id".into(), &"title".into());
        assert_eq!(view.title, "7");
    }

    #[test]
    fn renders_aligned_keys() {
        let record = Record::new().with("id", 1).with("title", "T").with("longer_key", true);
        let text = PreviewView::new(&record, &"id".into(), &"title".into()).render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "T");
        assert_eq!(lines[2], "id          1");
        assert_eq!(lines[3], "longer_key  true");
    }
}
