//! Descriptive statistics and narrative summaries for rows-shaped charts.
//!
//! Missing values are excluded from every statistic here while still
//! occupying their row position, so indices line up with the plotted rows.

pub mod confidence;
pub mod narrative;
pub mod types;
pub mod utility;

pub use types::{Accuracy, ConfidenceLevel, Highlight, InsightResult, Trend};

use tracing::debug;

use crate::config::InsightConfig;
use crate::normalize::{CanonicalRow, CanonicalShape, Label};
use crate::spec::ChartSpec;
use confidence::confidence;
use narrative::NarrativeInput;
use utility::{extrema, mean, sample_stddev, slope};

/// Computes insights with the default heuristics.
///
/// Returns `None` unless `shape` is `rows` with at least one numeric value.
pub fn compute_insights(shape: &CanonicalShape, spec: &ChartSpec) -> Option<InsightResult> {
    compute_insights_with(shape, spec, &InsightConfig::default())
}

pub fn compute_insights_with(
    shape: &CanonicalShape,
    spec: &ChartSpec,
    config: &InsightConfig,
) -> Option<InsightResult> {
    let rows = shape.rows()?;
    if rows.is_empty() {
        return None;
    }

    let valid: Vec<f64> = rows.iter().filter_map(|r| r.value).collect();
    let (max, min) = extrema(&valid)?;

    let mean = mean(&valid);
    let std = sample_stddev(&valid, mean);
    let slope = slope(&valid);
    let trend = Trend::classify(slope, mean, config.trend_threshold);

    let mut high_indices = Vec::new();
    let mut low_indices = Vec::new();
    if std > 0.0 {
        let band = config.outlier_band * std;
        for (i, row) in rows.iter().enumerate() {
            match row.value {
                Some(v) if v > mean + band => high_indices.push(i),
                Some(v) if v < mean - band => low_indices.push(i),
                _ => {}
            }
        }
    }

    let max_label = first_label_with(rows, max);
    let min_label = first_label_with(rows, min);
    let metric = spec.metric_name();

    debug!(
        rows = rows.len(),
        valid = valid.len(),
        mean,
        std,
        slope,
        high = high_indices.len(),
        low = low_indices.len(),
        "Computed chart insights"
    );

    let narrative = NarrativeInput {
        metric: &metric,
        mean,
        std,
        max,
        min,
        max_label: max_label.as_ref(),
        min_label: min_label.as_ref(),
        trend,
        has_high: !high_indices.is_empty(),
        has_low: !low_indices.is_empty(),
    };
    let analysis_text = narrative::analysis_text(&narrative);
    let recommendations = narrative::recommendations(&narrative);

    Some(InsightResult {
        labels: rows.iter().map(|r| r.label.clone()).collect(),
        raw_values: rows.iter().map(|r| r.value).collect(),
        high_indices,
        low_indices,
        mean,
        std,
        slope,
        max,
        min,
        max_label,
        min_label,
        trend,
        analysis_text,
        recommendations,
        accuracy: Accuracy {
            level: confidence(valid.len(), config),
            rows_used: valid.len(),
            rows_total: rows.len(),
            metric,
        },
    })
}

/// Label of the first row whose value equals `target`.
fn first_label_with(rows: &[CanonicalRow], target: f64) -> Option<Label> {
    rows.iter()
        .find(|r| r.value == Some(target))
        .and_then(|r| r.label.clone())
}
