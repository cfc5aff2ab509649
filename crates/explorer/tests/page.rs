//! Page flows end to end over file and in-memory sources.

use std::sync::Arc;

use explorer::{
    Column, ColumnConfig, ColumnKind, ExplorerError, ExplorerPage, FieldValue, FilterValue,
    MessageLevel, PageConfig, PaginationModel, QueryMode, Record,
};
use explorer_query::StaticSource;

const PROJECTS: &str = r#"[
  {"id": "alpha", "title": "Alpha", "is_public": true,
   "stats": {"columns": 10, "contributions": 120}},
  {"id": "beta", "title": "Beta", "is_public": false,
   "stats": {"columns": 500, "contributions": 40}},
  {"id": "gamma", "title": "Gamma rays", "is_public": true,
   "stats": {"columns": 60}},
  {"id": "delta", "title": "Delta", "is_public": true,
   "stats": {"columns": 80, "contributions": 75}}
]"#;

fn config_yaml(data_source: &str, mode: &str) -> String {
    format!(
        r#"
title: Projects
data_source: {data_source}
query_mode: {mode}
page_size: 2
filters:
  - {{ field: title, label: Title, operator: contains }}
  - {{ field: is_public, label: Public, operator: equals-one-of }}
  - field: stats.columns
    label: Columns
    operator: between-inclusive
    filterProps: {{ min: 0, max: 800 }}
columns:
  - {{ field: id, header: ID, width: 6, link: "https://example.org/p/{{value}}" }}
  - {{ field: title, header: Title, width: 12 }}
  - {{ field: stats.contributions, header: Contribs, width: 8, kind: number, chart: true }}
"#
    )
}

fn write_projects(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("projects.json");
    std::fs::write(&path, PROJECTS).unwrap();
    path.display().to_string()
}

#[tokio::test]
async fn range_and_search_compose() {
    let dir = tempfile::tempdir().unwrap();
    let config = PageConfig::from_yaml_str(&config_yaml(&write_projects(&dir), "client")).unwrap();
    let mut page = ExplorerPage::open(&config).unwrap();

    let snapshot = page.load().await;
    assert!(snapshot.is_success());
    assert_eq!(page.rows().len(), 4);

    page.set_filter("stats.columns", FilterValue::range(0.0, 100.0)).unwrap();
    page.set_search("a");

    let titles: Vec<String> = page
        .rows()
        .iter()
        .filter_map(|r| r.resolve("title").and_then(FieldValue::as_str).map(String::from))
        .collect();
    assert_eq!(titles, vec!["Alpha", "Gamma rays", "Delta"]);

    page.set_search("zzz");
    assert!(page.rows().is_empty());
    let messages = page.status_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, MessageLevel::Warning);
}

#[tokio::test]
async fn client_pages_are_cut_locally() {
    let dir = tempfile::tempdir().unwrap();
    let config = PageConfig::from_yaml_str(&config_yaml(&write_projects(&dir), "client")).unwrap();
    let page = ExplorerPage::open(&config).unwrap();
    page.load().await;

    let first = page.table();
    assert_eq!(first.rows.len(), 2);
    assert_eq!(first.total, 4);
    assert_eq!(first.rows[0].cells[0].link.as_deref(), Some("https://example.org/p/alpha"));
    assert!(first.rows[0].cells[2].chart);

    page.set_pagination(PaginationModel {
        page: 1,
        page_size: 2,
    });
    assert!(!page.needs_load());
    let second = page.table();
    assert_eq!(second.rows[0].id, "gamma");
    assert_eq!(second.summary(), "showing 3-4 of 4 (page 2/2)");

    // A new page size starts over at the first page.
    page.set_pagination(PaginationModel {
        page: 1,
        page_size: 3,
    });
    assert_eq!(page.pagination().page(), 0);
    assert_eq!(page.pagination().offset(), 0);
}

#[tokio::test]
async fn preview_and_chart_for_a_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = PageConfig::from_yaml_str(&config_yaml(&write_projects(&dir), "client")).unwrap();
    let mut page = ExplorerPage::open(&config).unwrap();
    page.load().await;
    page.set_filter_input("is_public", "true").unwrap();

    let selected = page.select_row("delta").unwrap();
    assert_eq!(selected.resolve("title").and_then(FieldValue::as_str), Some("Delta"));
    let preview = page.preview().unwrap();
    assert_eq!(preview.title, "Delta");
    assert_eq!(preview.get("stats.contributions"), Some("75"));

    let chart = page.chart_for("delta").unwrap();
    assert_eq!(chart.title, "Contribs");
    let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Alpha", "Gamma rays", "Delta"]);
    assert!(chart.bars[2].highlighted);
    assert!(chart.bars[1].missing);

    assert!(matches!(
        page.select_row("beta"),
        Err(ExplorerError::UnknownRow(_))
    ));
    assert!(page.close_preview());
    assert!(page.preview().is_none());
    assert!(!page.close_preview());
}

#[tokio::test]
async fn missing_file_shows_error_banner() {
    let config = PageConfig::from_yaml_str(&config_yaml("/no/such/projects.json", "client")).unwrap();
    let page = ExplorerPage::open(&config).unwrap();

    let snapshot = page.load().await;
    assert!(snapshot.is_error());
    let messages = page.status_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, MessageLevel::Error);
    assert!(messages[0].text.contains("projects.json"));
    assert!(page.table().is_empty());
}

#[tokio::test]
async fn server_mode_loads_each_page() {
    let records: Vec<Record> = (0..5)
        .map(|i| Record::new().with("id", i).with("title", format!("Row {i}")))
        .collect();
    let config = PageConfig::from_yaml_str(&config_yaml("memory", "server")).unwrap();
    let page = ExplorerPage::new(&config, Arc::new(StaticSource::new("rows", records)));

    page.load().await;
    let table = page.table();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.total, 5);
    assert_eq!(table.page_count, 3);

    page.set_pagination(PaginationModel {
        page: 2,
        page_size: 2,
    });
    assert!(page.needs_load());
    page.load().await;
    assert!(!page.needs_load());

    let last = page.table();
    assert_eq!(last.rows.len(), 1);
    assert_eq!(last.rows[0].id, "4");
    assert_eq!(last.first, 5);
}

#[tokio::test]
async fn server_mode_filters_local_rows_before_paging() {
    let records: Vec<Record> = (0..5)
        .map(|i| Record::new().with("id", i).with("title", format!("Row {i}")))
        .collect();
    let config = PageConfig::from_yaml_str(&config_yaml("memory", "server")).unwrap();
    let mut page = ExplorerPage::new(&config, Arc::new(StaticSource::new("rows", records)));
    page.load().await;

    page.set_filter("title", "row 4").unwrap();
    assert!(page.needs_load());
    page.load().await;
    let table = page.table();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].id, "4");
    assert_eq!(table.total, 1);
    assert_eq!(table.page_count, 1);

    page.set_search("row");
    assert!(page.needs_load());
    page.load().await;
    assert_eq!(page.table().total, 1);

    page.clear_filters();
    page.load().await;
    let table = page.table();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.total, 5);
}

#[tokio::test]
async fn custom_columns_derive_and_render() {
    let records = vec![
        Record::new()
            .with("id", 1)
            .with("stats", Record::new().with("columns", 3).with("rows", 4)),
    ];
    let mut config = PageConfig::new("Cells", "memory");
    config.columns = vec![ColumnConfig::new("id")];
    let page = ExplorerPage::new(&config, Arc::new(StaticSource::new("cells", records)))
        .with_columns(vec![
            Column::new("id", "ID").width(3),
            Column::new("cells", "Cells")
                .kind(ColumnKind::Number)
                .value_with(|r| {
                    let get = |p: &str| {
                        r.resolve(p)
                            .and_then(FieldValue::as_number)
                            .map(|n| n.to_f64())
                            .unwrap_or(0.0)
                    };
                    FieldValue::from(get("stats.columns") * get("stats.rows"))
                })
                .render_with(|v, ctx| format!("{v}/{}", ctx.rows.len())),
        ]);
    page.load().await;

    let table = page.table();
    assert_eq!(table.headers, vec!["ID", "Cells"]);
    assert_eq!(table.rows[0].cells[1].text, "12/1");
    assert_eq!(page.pagination().mode(), QueryMode::Client);
}
