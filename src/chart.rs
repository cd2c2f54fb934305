//! Normalize → insights → plot points, the path a renderer takes per chart.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::InsightConfig;
use crate::drilldown::{Drilldown, drilldown_for};
use crate::insights::{Highlight, InsightResult, compute_insights_with};
use crate::normalize::{CanonicalShape, Label, normalize_unwrapped, records_to_rows};
use crate::spec::ChartSpec;

/// One drawable element. Missing values draw with zero magnitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub label: Option<Label>,
    pub magnitude: f64,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreparedChart {
    pub spec: ChartSpec,
    pub shape: CanonicalShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<InsightResult>,
}

/// Prepares a chart from raw JSON with the default insight heuristics.
pub fn prepare(payload: &Value, spec: &Value) -> PreparedChart {
    PreparedChart::build(payload, ChartSpec::from_value(spec), &InsightConfig::default())
}

impl PreparedChart {
    /// Insights run only when the spec in effect asks for them. For a
    /// `{chart_spec, aggregated}` wrapper that is the nested spec.
    pub fn build(payload: &Value, spec: ChartSpec, config: &InsightConfig) -> Self {
        let (shape, spec) = normalize_unwrapped(payload, spec);
        let insights = if spec.show_insights {
            compute_insights_with(&shape, &spec, config)
        } else {
            None
        };

        debug!(
            kind = shape.kind(),
            insights = insights.is_some(),
            "Chart prepared"
        );

        Self {
            spec,
            shape,
            insights,
        }
    }

    /// Computes insights regardless of the spec's `showInsights` flag.
    pub fn with_insights(mut self, config: &InsightConfig) -> Self {
        if self.insights.is_none() {
            self.insights = compute_insights_with(&self.shape, &self.spec, config);
        }
        self
    }

    /// Points for single-series shapes (`rows`, and `raw_table` once its axes
    /// resolve). Multi-series tables and degraded shapes yield nothing.
    pub fn plot_points(&self) -> Vec<PlotPoint> {
        match &self.shape {
            CanonicalShape::Rows { rows } => rows
                .iter()
                .enumerate()
                .map(|(i, row)| PlotPoint {
                    label: row.label.clone(),
                    magnitude: row.magnitude(),
                    highlight: self
                        .insights
                        .as_ref()
                        .map_or(Highlight::None, |ins| ins.highlight(i)),
                })
                .collect(),
            CanonicalShape::RawTable { table } => {
                let Some((x, y)) = CanonicalShape::resolve_axes(table, &self.spec) else {
                    return Vec::new();
                };
                records_to_rows(table, &x, &y)
                    .into_iter()
                    .map(|row| PlotPoint {
                        magnitude: row.magnitude(),
                        label: row.label,
                        highlight: Highlight::None,
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Refinement to report when the plotted element at `index` is clicked.
    pub fn drilldown(&self, index: usize) -> Option<Drilldown> {
        let points = self.plot_points();
        let point = points.get(index)?;
        drilldown_for(&self.spec, point.label.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insights_only_when_requested() {
        let payload = json!({"labels": ["a", "b"], "values": [1, 2]});

        let quiet = prepare(&payload, &json!({}));
        assert!(quiet.insights.is_none());

        let loud = prepare(&payload, &json!({"showInsights": true}));
        assert!(loud.insights.is_some());
    }

    #[test]
    fn test_with_insights_overrides_flag() {
        let payload = json!({"labels": ["a", "b"], "values": [1, 2]});
        let chart = prepare(&payload, &Value::Null).with_insights(&InsightConfig::default());
        assert!(chart.insights.is_some());
    }

    #[test]
    fn test_missing_values_plot_as_zero() {
        let payload = json!({"labels": ["a", "b", "c"], "values": [4, "n/a", 6]});
        let chart = prepare(&payload, &json!({"showInsights": true}));

        let magnitudes: Vec<_> = chart.plot_points().iter().map(|p| p.magnitude).collect();
        assert_eq!(magnitudes, vec![4.0, 0.0, 6.0]);

        // excluded from statistics, not averaged in as zero
        assert_eq!(chart.insights.unwrap().mean, 5.0);
    }

    #[test]
    fn test_points_carry_highlights() {
        let payload = json!([
            {"label": "A", "value": 10},
            {"label": "B", "value": 20},
            {"label": "C", "value": 30},
            {"label": "D", "value": 1000}
        ]);
        let chart = prepare(&payload, &json!({"showInsights": true}));
        let highlights: Vec<_> = chart.plot_points().iter().map(|p| p.highlight).collect();
        assert_eq!(
            highlights,
            vec![Highlight::None, Highlight::None, Highlight::None, Highlight::High]
        );
    }

    #[test]
    fn test_raw_table_points_use_resolved_axes() {
        let payload = json!({"raw_table": [
            {"city": "Oslo", "pop": "709,000"},
            {"city": "Bergen", "pop": null}
        ]});
        let chart = prepare(&payload, &Value::Null);
        let points = chart.plot_points();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].magnitude, 709_000.0);
        assert_eq!(points[1].magnitude, 0.0);
    }

    #[test]
    fn test_table_has_no_single_series_points() {
        let payload = json!({"labels": ["a"], "series": [{"name": "s", "values": [1]}]});
        assert!(prepare(&payload, &Value::Null).plot_points().is_empty());
    }

    #[test]
    fn test_wrapper_spec_takes_effect() {
        let payload = json!({
            "chart_spec": {"title": "Inner", "showInsights": true},
            "aggregated": {"labels": ["a", "b"], "values": [1, 2]}
        });
        let chart = prepare(&payload, &json!({"title": "Outer"}));
        assert_eq!(chart.spec.title.as_deref(), Some("Inner"));
        assert!(chart.insights.is_some());
    }

    #[test]
    fn test_drilldown_by_index() {
        let payload = json!({"labels": [2020, 2021], "values": [3, 4]});
        let chart = prepare(&payload, &json!({"drilldownKey": "year"}));

        let target = chart.drilldown(1).unwrap();
        assert_eq!(target.to_filter(), json!({"year": 2021}));
        assert!(chart.drilldown(5).is_none());
    }
}
