//! CLI entry point for chartlens.
//!
//! Provides subcommands for normalizing aggregation payloads into chart data
//! with insights, building payloads from row datasets, and suggesting charts.

use anyhow::Result;
use chartlens::{
    aggregate::aggregate_for_chart,
    chart::{PlotPoint, PreparedChart},
    config::InsightConfig,
    output::{InsightRecord, append_record, print_json, print_pretty},
    parser::{load_json, load_rows},
    spec::ChartSpec,
    suggest::suggest_charts,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "chartlens")]
#[command(about = "Normalize chart payloads and explain them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an aggregation payload and compute insights
    Render {
        /// JSON file with the aggregation payload (omit to use the spec's inline data)
        #[arg(short, long)]
        payload: Option<String>,

        /// JSON file with the chart specification
        #[arg(short, long)]
        spec: Option<String>,

        /// Compute insights even if the spec does not ask for them
        #[arg(short, long, default_value_t = false)]
        insights: bool,

        /// CSV file to append an insight history record to
        #[arg(long)]
        history: Option<String>,

        /// JSON file with insight thresholds (falls back to CHARTLENS_CONFIG)
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Build an aggregation payload from a JSON array of rows
    Aggregate {
        /// JSON file with an array of row objects
        #[arg(short, long)]
        data: String,

        /// JSON file with the chart specification (x, y, agg, type)
        #[arg(short, long)]
        spec: String,
    },
    /// Suggest chart specifications for a JSON array of rows
    Suggest {
        /// JSON file with an array of row objects
        #[arg(short, long)]
        data: String,

        /// Maximum number of suggestions
        #[arg(short = 'n', long, default_value_t = 5)]
        top_n: usize,
    },
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    #[serde(flatten)]
    chart: &'a PreparedChart,
    points: Vec<PlotPoint>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/chartlens.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("chartlens.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            payload,
            spec,
            insights,
            history,
            config,
        } => {
            let config = config.or_else(|| std::env::var("CHARTLENS_CONFIG").ok());
            let config = InsightConfig::load_or_default(config.as_deref())?;
            render(payload, spec, insights, history, &config)?;
        }
        Commands::Aggregate { data, spec } => {
            let rows = load_rows(&data)?;
            let spec = ChartSpec::from_value(&load_json(&spec)?);
            let payload = aggregate_for_chart(&rows, &spec)?;

            info!(groups = payload.labels.len(), "Aggregation built");
            print_json(&payload)?;
        }
        Commands::Suggest { data, top_n } => {
            let rows = load_rows(&data)?;
            let suggestions = suggest_charts(&rows, top_n);

            info!(rows = rows.len(), suggestions = suggestions.len(), "Suggestions ready");
            print_json(&suggestions)?;
        }
    }

    Ok(())
}

/// Loads an optional JSON file, treating an omitted path as `null`.
fn load_optional(path: Option<&str>) -> Result<Value> {
    match path {
        Some(p) => load_json(p),
        None => Ok(Value::Null),
    }
}

/// Normalizes the payload, prints the prepared chart, and optionally records
/// the run in the insight history.
#[tracing::instrument(skip(config))]
fn render(
    payload: Option<String>,
    spec: Option<String>,
    force_insights: bool,
    history: Option<String>,
    config: &InsightConfig,
) -> Result<()> {
    let payload = load_optional(payload.as_deref())?;
    let spec = ChartSpec::from_value(&load_optional(spec.as_deref())?);

    let mut chart = PreparedChart::build(&payload, spec, config);
    if force_insights {
        chart = chart.with_insights(config);
    }
    print_pretty(&chart);

    match chart.shape.kind() {
        "unknown" => warn!("Payload shape not recognized; renderer must fall back"),
        "empty" => warn!("No payload and no usable inline data"),
        kind => info!(kind, rows = chart.shape.row_count(), "Payload normalized"),
    }

    if let Some(insights) = &chart.insights {
        info!(
            trend = ?insights.trend,
            confidence = ?insights.accuracy.level,
            "{}",
            insights.analysis_text
        );
    }

    if let Some(path) = history {
        append_record(&path, &InsightRecord::from_chart(&chart))?;
        info!(path = %path, "Insight history updated");
    }

    print_json(&RenderOutput {
        chart: &chart,
        points: chart.plot_points(),
    })
}
