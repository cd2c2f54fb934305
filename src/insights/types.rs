//! Data types returned by the insight engine.

use serde::Serialize;

use crate::normalize::Label;

/// Direction of the least-squares slope relative to the mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Compares the slope against `threshold * mean` literally. With a mean
    /// of exactly zero any nonzero slope is directional; with a negative mean
    /// the band flips sign.
    pub fn classify(slope: f64, mean: f64, threshold: f64) -> Self {
        if slope > threshold * mean {
            Trend::Increasing
        } else if slope < -threshold * mean {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    /// Wording used in narrative sentences.
    pub fn describe(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "relatively stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Visual emphasis of a single plotted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    High,
    Low,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accuracy {
    pub level: ConfidenceLevel,
    /// Rows with a numeric value.
    pub rows_used: usize,
    pub rows_total: usize,
    pub metric: String,
}

/// Descriptive statistics and narrative for one rows-shaped chart.
///
/// Always derived on demand from the canonical rows; indices refer to the
/// original row positions, including rows whose value is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub labels: Vec<Option<Label>>,
    pub raw_values: Vec<Option<f64>>,
    pub high_indices: Vec<usize>,
    pub low_indices: Vec<usize>,
    pub mean: f64,
    pub std: f64,
    pub slope: f64,
    pub max: f64,
    pub min: f64,
    pub max_label: Option<Label>,
    pub min_label: Option<Label>,
    pub trend: Trend,
    pub analysis_text: String,
    pub recommendations: Vec<String>,
    pub accuracy: Accuracy,
}

impl InsightResult {
    pub fn highlight(&self, index: usize) -> Highlight {
        if self.high_indices.contains(&index) {
            Highlight::High
        } else if self.low_indices.contains(&index) {
            Highlight::Low
        } else {
            Highlight::None
        }
    }
}
