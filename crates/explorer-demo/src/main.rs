//! `explore`: browse a record collection from the terminal.
//!
//! ```text
//! explore --config explorer.yaml --filter is_public=true --filter stats.columns=0..100 \
//!         --search alpha --page-size 10 --preview mp-1 --chart mp-1
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use explorer::{
    ActiveFilters, ChartView, ExplorerPage, FilterValue, Message, MessageLevel, PageConfig,
    PaginationModel, PreviewView, QueryMode, TableView,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "explore", version)]
#[command(about = "Browse a record collection with filters, search and paging")]
struct Args {
    /// Page config (YAML)
    #[arg(long, short = 'c', default_value = "explorer.yaml")]
    config: PathBuf,

    /// Data source override: a .json/.csv file or an http(s) endpoint
    #[arg(long, short = 's')]
    source: Option<String>,

    /// Where filtering and paging happen: client or server
    #[arg(long, short = 'm')]
    mode: Option<QueryMode>,

    /// Free-text search over every text field
    #[arg(long, short = 'q', default_value = "")]
    search: String,

    /// Active filter as field=value (repeatable). Ranges use min..max,
    /// sets are comma-separated.
    #[arg(long = "filter", short = 'f', value_parser = parse_key_val)]
    filters: Vec<(String, String)>,

    /// Page to show, starting at 1
    #[arg(long, short = 'p', default_value_t = 1)]
    page: usize,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Show every field of the row with this id
    #[arg(long)]
    preview: Option<String>,

    /// Show the chart cell's chart for the row with this id
    #[arg(long)]
    chart: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Disable colors
    #[arg(long)]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Text,
    Json,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid field=value pair: {}", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

/// Everything shown for one invocation, as emitted by `--output json`.
#[derive(Serialize)]
struct Report {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    filters: ActiveFilters,
    #[serde(skip_serializing_if = "String::is_empty")]
    search: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<Message>,
    table: TableView,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<PreviewView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartView>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        console::set_colors_enabled(false);
    }

    let config = load_config(&args)?;
    debug!(
        source = %config.data_source,
        mode = %config.query_mode,
        filters = config.filters.len(),
        "page config loaded"
    );
    let mut page = ExplorerPage::open(&config)
        .with_context(|| format!("failed to open data source {}", config.data_source))?;

    for (field, value) in &args.filters {
        page.set_filter_input(field, value)
            .with_context(|| format!("invalid filter {}={}", field, value))?;
    }
    page.set_search(args.search.clone());
    page.set_pagination(PaginationModel {
        page: args.page.saturating_sub(1),
        page_size: page.pagination().page_size(),
    });

    let snapshot = if page.needs_load() {
        page.load().await
    } else {
        page.snapshot()
    };
    if snapshot.is_error() {
        let reason = snapshot.error.unwrap_or_default();
        report_messages(&page.status_messages());
        bail!("could not load records: {}", reason);
    }

    if let Some(id) = &args.preview {
        page.select_row(id)?;
    }
    let chart = match &args.chart {
        Some(id) => Some(page.chart_for(id)?),
        None => None,
    };

    let report = Report {
        title: page.title().to_string(),
        description: page.description().map(str::to_string),
        filters: page.filters(),
        search: page.search().to_string(),
        messages: page.status_messages(),
        table: page.table(),
        preview: page.preview(),
        chart,
    };

    match args.output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Output::Text => print_text(&report),
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<PageConfig> {
    let mut config = PageConfig::from_path(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    match &args.source {
        Some(source) => config.data_source = source.clone(),
        None => config.data_source = relative_to(&args.config, &config.data_source),
    }
    if let Some(mode) = args.mode {
        config.query_mode = mode;
    }
    if let Some(size) = args.page_size {
        config.page_size = size.max(1);
    }
    Ok(config)
}

/// File sources in a config are relative to the config file.
fn relative_to(config_path: &Path, source: &str) -> String {
    if source.starts_with("http://") || source.starts_with("https://") {
        return source.to_string();
    }
    let path = Path::new(source);
    if path.is_absolute() {
        return source.to_string();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path).display().to_string(),
        _ => source.to_string(),
    }
}

fn report_messages(messages: &[Message]) {
    for message in messages {
        eprintln!("{}", styled(message));
    }
}

fn styled(message: &Message) -> String {
    match message.level {
        MessageLevel::Info => style(message.to_string()).dim().to_string(),
        MessageLevel::Warning => style(message.to_string()).yellow().to_string(),
        MessageLevel::Error => style(message.to_string()).red().bold().to_string(),
    }
}

fn print_text(report: &Report) {
    println!("{}", style(&report.title).bold());
    if let Some(description) = &report.description {
        println!("{}", style(description).dim());
    }
    if !report.filters.is_empty() || !report.search.is_empty() {
        let mut parts: Vec<String> = report
            .filters
            .iter()
            .map(|(field, value)| format!("{}={}", field, describe_filter(value)))
            .collect();
        if !report.search.is_empty() {
            parts.push(format!("search \"{}\"", report.search));
        }
        println!("{} {}", style("filtered by:").dim(), parts.join(", "));
    }
    println!();
    for message in &report.messages {
        println!("{}", styled(message));
    }
    print!("{}", report.table.render());

    if let Some(preview) = &report.preview {
        println!();
        print!("{}", preview.render());
    }
    if let Some(chart) = &report.chart {
        println!();
        print!("{}", chart.render(40));
    }
}

fn describe_filter(value: &FilterValue) -> String {
    match value {
        FilterValue::Text(text) => format!("~{}", text),
        FilterValue::OneOf(values) => values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|"),
        FilterValue::Range { min, max } => format!("{}..{}", min, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_pairs() {
        assert_eq!(
            parse_key_val("stats.columns=0..100").unwrap(),
            ("stats.columns".to_string(), "0..100".to_string())
        );
        assert_eq!(
            parse_key_val("title=a=b").unwrap(),
            ("title".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("title").is_err());
    }

    #[test]
    fn sources_resolve_next_to_config() {
        let config = Path::new("pages/explorer.yaml");
        assert_eq!(
            relative_to(config, "data/p.json"),
            Path::new("pages").join("data/p.json").display().to_string()
        );
        assert_eq!(relative_to(config, "/abs/p.json"), "/abs/p.json");
        assert_eq!(relative_to(config, "https://x.org/api"), "https://x.org/api");
        assert_eq!(relative_to(Path::new("explorer.yaml"), "p.json"), "p.json");
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "explore",
            "--mode",
            "server",
            "-f",
            "is_public=true",
            "--output",
            "json",
        ])
        .unwrap();
        assert_eq!(args.mode, Some(QueryMode::Server));
        assert_eq!(args.filters.len(), 1);
        assert_eq!(args.output, Output::Json);
        assert_eq!(args.page, 1);
    }
}
