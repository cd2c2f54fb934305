//! Chart specification model.
//!
//! Specifications arrive from the query service as loosely-typed JSON. They
//! are read leniently: unknown chart types fall back to `bar`, misspelled or
//! mistyped fields are ignored, and a non-object spec is the default spec.

use serde::Serialize;
use serde_json::{Map, Value};

/// Requested visualization type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Area,
    Pie,
    Histogram,
    Scatter,
}

impl ChartType {
    /// Parses a type name, defaulting to [`ChartType::Bar`] when unrecognized.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "line" => ChartType::Line,
            "area" => ChartType::Area,
            "pie" => ChartType::Pie,
            "histogram" => ChartType::Histogram,
            "scatter" => ChartType::Scatter,
            _ => ChartType::Bar,
        }
    }
}

/// Aggregation applied when building a payload from raw rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
    Count,
}

impl Aggregation {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mean" | "avg" | "average" => Aggregation::Mean,
            "count" => Aggregation::Count,
            _ => Aggregation::Sum,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drilldown_key: Option<String>,
    pub show_insights: bool,
    pub agg: Aggregation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
}

impl ChartSpec {
    pub fn new(chart_type: ChartType) -> Self {
        ChartSpec {
            chart_type,
            ..Default::default()
        }
    }

    /// Builds a spec from arbitrary JSON. Never fails.
    ///
    /// Axis names are read from `x`/`y`, then `xKey`/`yKey`.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return ChartSpec::default();
        };

        ChartSpec {
            chart_type: string_field(obj, &["type"])
                .map(|t| ChartType::parse(&t))
                .unwrap_or_default(),
            x: string_field(obj, &["x", "xKey"]),
            y: string_field(obj, &["y", "yKey"]),
            title: string_field(obj, &["title"]),
            drilldown_key: string_field(obj, &["drilldownKey", "drilldown_key"]),
            show_insights: ["showInsights", "show_insights"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_bool))
                .unwrap_or(false),
            agg: string_field(obj, &["agg", "y_agg"])
                .map(|a| Aggregation::parse(&a))
                .unwrap_or_default(),
            data: obj.get("data").and_then(Value::as_array).cloned(),
        }
    }

    pub fn with_axes(mut self, x: &str, y: &str) -> Self {
        self.x = Some(x.to_string());
        self.y = Some(y.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_drilldown(mut self, key: &str) -> Self {
        self.drilldown_key = Some(key.to_string());
        self
    }

    /// Label used for the measured quantity in insight narratives.
    ///
    /// The `y` field name wins; otherwise the chart type decides.
    pub fn metric_name(&self) -> String {
        if let Some(y) = self.y.as_deref().filter(|y| !y.trim().is_empty()) {
            return y.to_string();
        }

        match self.chart_type {
            ChartType::Histogram => "frequency".into(),
            ChartType::Pie => "share".into(),
            _ => "value".into(),
        }
    }
}

/// First non-empty string among `keys`.
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
