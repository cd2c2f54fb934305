//! Output formatting and persistence for prepared charts.
//!
//! Supports pretty-printing, JSON output, and a CSV history of insight runs.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::chart::PreparedChart;
use crate::insights::{ConfidenceLevel, Trend};
use crate::spec::ChartType;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One line of insight history: what was charted and what the engine saw.
#[derive(Debug, Serialize)]
pub struct InsightRecord {
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub chart_type: ChartType,
    pub kind: String,
    pub rows: usize,
    pub rows_used: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub trend: Option<Trend>,
    pub confidence: Option<ConfidenceLevel>,
}

impl InsightRecord {
    pub fn from_chart(chart: &PreparedChart) -> Self {
        let insights = chart.insights.as_ref();
        InsightRecord {
            timestamp: Utc::now(),
            title: chart.spec.title.clone(),
            chart_type: chart.spec.chart_type,
            kind: chart.shape.kind().to_string(),
            rows: chart.shape.row_count(),
            rows_used: insights.map(|i| i.accuracy.rows_used),
            mean: insights.map(|i| i.mean),
            std: insights.map(|i| i.std),
            max: insights.map(|i| i.max),
            min: insights.map(|i| i.min),
            trend: insights.map(|i| i.trend),
            confidence: insights.map(|i| i.accuracy.level),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends an [`InsightRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &InsightRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
