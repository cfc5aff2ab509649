//! Table columns and the cell extension points.

use std::fmt;
use std::rc::Rc;

use explorer_seeker::{FieldPath, FieldValue, Record};

use crate::config::{ColumnConfig, ColumnKind};

/// Derives a cell value from a record.
pub type ValueFn = Rc<dyn Fn(&Record) -> FieldValue>;

/// Turns a cell value into display text.
pub type RenderFn = Rc<dyn Fn(&FieldValue, &CellContext<'_>) -> String>;

/// What a renderer can see besides the value itself.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// The row being rendered.
    pub record: &'a Record,
    /// Every row that passed the filters, not only the visible page.
    pub rows: &'a [&'a Record],
}

/// A table column: where its value comes from and how it is shown.
#[derive(Clone)]
pub struct Column {
    pub path: FieldPath,
    pub header: String,
    pub width: usize,
    pub kind: ColumnKind,
    /// Cell opens a chart across all filtered rows.
    pub chart: bool,
    /// URL template with `{value}`.
    pub link: Option<String>,
    value: Option<ValueFn>,
    render: Option<RenderFn>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("path", &self.path)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("kind", &self.kind)
            .field("chart", &self.chart)
            .field("link", &self.link)
            .field("custom_value", &self.value.is_some())
            .field("custom_render", &self.render.is_some())
            .finish()
    }
}

impl Column {
    pub fn new(field: &str, header: impl Into<String>) -> Self {
        Column {
            path: FieldPath::parse(field),
            header: header.into(),
            width: 16,
            kind: ColumnKind::Text,
            chart: false,
            link: None,
            value: None,
            render: None,
        }
    }

    pub fn from_config(config: &ColumnConfig) -> Self {
        Column {
            path: FieldPath::parse(&config.field),
            header: config.header_text(),
            width: config.width.max(1),
            kind: config.kind,
            chart: config.chart,
            link: config.link.clone(),
            value: None,
            render: None,
        }
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replaces path lookup with a derived value.
    pub fn value_with(mut self, f: impl Fn(&Record) -> FieldValue + 'static) -> Self {
        self.value = Some(Rc::new(f));
        self
    }

    /// Replaces the default formatting.
    pub fn render_with(
        mut self,
        f: impl Fn(&FieldValue, &CellContext<'_>) -> String + 'static,
    ) -> Self {
        self.render = Some(Rc::new(f));
        self
    }

    /// The cell value for `record`. Missing paths give `Null`.
    pub fn value(&self, record: &Record) -> FieldValue {
        match &self.value {
            Some(f) => f(record),
            None => self.path.resolve(record).cloned().unwrap_or_default(),
        }
    }

    /// Display text for a value.
    pub fn render(&self, value: &FieldValue, ctx: &CellContext<'_>) -> String {
        if let Some(f) = &self.render {
            return f(value, ctx);
        }
        match (self.kind, value) {
            (ColumnKind::Boolean, FieldValue::Bool(true)) => "yes".to_string(),
            (ColumnKind::Boolean, FieldValue::Bool(false)) => "no".to_string(),
            (_, FieldValue::Null) => String::new(),
            (_, other) => other.to_string(),
        }
    }

    /// The link target for a value, when this column cross-links.
    pub fn link_for(&self, value: &FieldValue) -> Option<String> {
        let template = self.link.as_ref()?;
        let shown = value.display()?;
        Some(template.replace("{value}", &shown))
    }

    pub fn right_aligned(&self) -> bool {
        self.kind == ColumnKind::Number
    }
}
