//! Page configuration.
//!
//! A page is described in YAML:
//!
//! ```yaml
//! title: Explore projects
//! data_source: data/projects.json
//! id_field: id
//! query_mode: client
//! page_size: 25
//! filters:
//!   - field: title
//!     label: Title
//!     operator: contains
//!   - field: stats.columns
//!     label: Columns
//!     operator: between-inclusive
//!     filterProps: { min: 0, max: 800 }
//! columns:
//!   - field: id
//!     header: ID
//!     width: 8
//!     link: "https://example.org/projects/{value}"
//!   - field: stats.contributions
//!     header: Contributions
//!     kind: number
//!     chart: true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use explorer_query::{QueryMode, DEFAULT_PAGE_SIZE};
use explorer_seeker::{FieldPath, FilterConfigs};
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};

/// How a column's values are displayed and aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Boolean,
}

/// One table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Dotted path of the displayed value.
    pub field: String,
    #[serde(default)]
    pub header: Option<String>,
    /// Display width in terminal cells.
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default)]
    pub kind: ColumnKind,
    /// Show a chart of this value across all filtered rows.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub chart: bool,
    /// URL template; `{value}` is replaced by the cell value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn default_width() -> usize {
    16
}

impl ColumnConfig {
    pub fn new(field: impl Into<String>) -> Self {
        ColumnConfig {
            field: field.into(),
            header: None,
            width: default_width(),
            kind: ColumnKind::Text,
            chart: false,
            link: None,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn chart(mut self) -> Self {
        self.chart = true;
        self
    }

    pub fn link(mut self, template: impl Into<String>) -> Self {
        self.link = Some(template.into());
        self
    }

    /// The header, or the last path segment when none is set.
    pub fn header_text(&self) -> String {
        match &self.header {
            Some(header) => header.clone(),
            None => self
                .field
                .rsplit('.')
                .next()
                .unwrap_or(&self.field)
                .to_string(),
        }
    }
}

/// Everything needed to build an explorer page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// File path or `http(s)://` endpoint.
    pub data_source: String,
    /// Field identifying a record. Rows without it are identified by
    /// position.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Field used for preview titles and chart labels.
    #[serde(default = "default_title_field")]
    pub title_field: String,
    #[serde(default)]
    pub query_mode: QueryMode,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Parameters sent with every request to the data source.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub static_params: BTreeMap<String, String>,
    #[serde(default)]
    pub filters: FilterConfigs,
    /// Table columns. When empty, [`PageConfig::default_columns`] is used.
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_title_field() -> String {
    "title".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl PageConfig {
    pub fn new(title: impl Into<String>, data_source: impl Into<String>) -> Self {
        PageConfig {
            title: title.into(),
            description: None,
            data_source: data_source.into(),
            id_field: default_id_field(),
            title_field: default_title_field(),
            query_mode: QueryMode::default(),
            page_size: default_page_size(),
            static_params: BTreeMap::new(),
            filters: FilterConfigs::default(),
            columns: Vec::new(),
        }
    }

    /// Parses and validates a YAML page config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "<inline>")
    }

    /// Reads a YAML page config from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ExplorerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&yaml, &path.display().to_string())
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self> {
        let config: PageConfig =
            serde_yaml::from_str(yaml).map_err(|source| ExplorerError::ConfigParse {
                origin: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks what serde cannot: sizes, duplicate filters and paths.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ExplorerError::InvalidConfig(
                "page_size must be at least 1".into(),
            ));
        }
        if self.data_source.trim().is_empty() {
            return Err(ExplorerError::InvalidConfig(
                "data_source must not be empty".into(),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for filter in self.filters.iter() {
            if !seen.insert(filter.field.as_str()) {
                return Err(ExplorerError::InvalidConfig(format!(
                    "filter '{}' is declared twice",
                    filter.field
                )));
            }
            if !filter.path().is_valid() {
                return Err(ExplorerError::InvalidConfig(format!(
                    "filter field '{}' is not a valid path",
                    filter.field
                )));
            }
        }
        for column in &self.columns {
            if !FieldPath::parse(&column.field).is_valid() {
                return Err(ExplorerError::InvalidConfig(format!(
                    "column field '{}' is not a valid path",
                    column.field
                )));
            }
        }
        Ok(())
    }

    /// Static params in request order.
    pub fn static_params(&self) -> Vec<(String, String)> {
        self.static_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Configured columns, falling back to the default set.
    pub fn columns(&self) -> Vec<ColumnConfig> {
        if self.columns.is_empty() {
            Self::default_columns()
        } else {
            self.columns.clone()
        }
    }

    /// The default project table: id, title, visibility flags, column
    /// count and contributions with a chart.
    pub fn default_columns() -> Vec<ColumnConfig> {
        vec![
            ColumnConfig::new("id").header("ID").width(10),
            ColumnConfig::new("title").header("Title").width(40),
            ColumnConfig::new("is_public")
                .header("Public")
                .width(8)
                .kind(ColumnKind::Boolean),
            ColumnConfig::new("is_approved")
                .header("Approved")
                .width(8)
                .kind(ColumnKind::Boolean),
            ColumnConfig::new("stats.columns")
                .header("Columns")
                .width(10)
                .kind(ColumnKind::Number),
            ColumnConfig::new("stats.contributions")
                .header("Contributions")
                .width(14)
                .kind(ColumnKind::Number)
                .chart(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_seeker::FilterOp;

    const YAML: &str = r#"
title: Explore projects
data_source: data/projects.json
query_mode: server
page_size: 10
static_params:
  project: mp
filters:
  - field: title
    label: Title
    operator: contains
  - field: stats.columns
    label: Columns
    operator: between-inclusive
    filterComponent: RangeSlider
    filterProps: { min: 0, max: 800 }
columns:
  - field: id
    header: ID
    width: 6
    link: "https://example.org/projects/{value}"
  - field: stats.contributions
    kind: number
    chart: true
"#;

    #[test]
    fn parses_full_config() {
        let config = PageConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.title, "Explore projects");
        assert_eq!(config.query_mode, QueryMode::Server);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.id_field, "id");
        assert_eq!(config.static_params(), vec![("project".into(), "mp".into())]);
        assert_eq!(config.filters.len(), 2);
        assert_eq!(
            config.filters.get("stats.columns").unwrap().operator,
            FilterOp::BetweenInclusive
        );
        assert_eq!(config.columns[1].header_text(), "contributions");
        assert!(config.columns[1].chart);
        assert_eq!(config.columns[1].width, 16);
    }

    #[test]
    fn defaults_apply() {
        let config = PageConfig::from_yaml_str("title: T\ndata_source: x.json\n").unwrap();
        assert_eq!(config.query_mode, QueryMode::Client);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.columns().len(), 6);
        assert!(config.columns().iter().any(|c| c.chart));
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = PageConfig::from_yaml_str("title: T\ndata_source: x.json\npage_size: 0\n")
            .unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_duplicate_filters() {
        let yaml = r#"
title: T
data_source: x.json
filters:
  - { field: title, label: A, operator: contains }
  - { field: title, label: B, operator: contains }
"#;
        assert!(matches!(
            PageConfig::from_yaml_str(yaml),
            Err(ExplorerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn reports_yaml_errors() {
        assert!(matches!(
            PageConfig::from_yaml_str("title: [unterminated"),
            Err(ExplorerError::ConfigParse { .. })
        ));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.yaml");
        std::fs::write(&path, YAML).unwrap();
        let config = PageConfig::from_path(&path).unwrap();
        assert_eq!(config.columns.len(), 2);

        let missing = PageConfig::from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, ExplorerError::ConfigRead { .. }));
    }
}
