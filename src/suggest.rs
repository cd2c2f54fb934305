//! Heuristic chart suggestions for a row dataset.

use serde_json::Value;
use tracing::debug;

use crate::coerce::coerce_field;
use crate::spec::{ChartSpec, ChartType};

/// Column names in first-seen order across all object rows.
fn columns(rows: &[Value]) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    for obj in rows.iter().filter_map(Value::as_object) {
        for key in obj.keys() {
            if !cols.contains(key) {
                cols.push(key.clone());
            }
        }
    }
    cols
}

/// A column is numeric when any of its values coerces to a number.
fn is_numeric(rows: &[Value], column: &str) -> bool {
    rows.iter()
        .any(|row| coerce_field(row.get(column)).is_some())
}

fn suggestion(chart_type: ChartType, x: &str, y: &str, title: String) -> ChartSpec {
    ChartSpec::new(chart_type)
        .with_axes(x, y)
        .with_title(&title)
        .with_drilldown(x)
}

/// Suggests up to `max(1, top_n)` chart specs.
///
/// A `year` column is the preferred x dimension, otherwise the first
/// categorical column. Every other numeric column gets a bar chart (and a
/// line chart when a year column exists), followed by one pie chart.
pub fn suggest_charts(rows: &[Value], top_n: usize) -> Vec<ChartSpec> {
    let cols = columns(rows);
    let (numeric, categorical): (Vec<&String>, Vec<&String>) =
        cols.iter().partition(|c| is_numeric(rows, c));

    let year = cols.iter().find(|c| c.eq_ignore_ascii_case("year"));
    let x_dim = year.or(categorical.first().copied());

    debug!(
        columns = cols.len(),
        numeric = numeric.len(),
        categorical = categorical.len(),
        year = year.is_some(),
        "Inferred column types"
    );

    let mut out = Vec::new();

    if let Some(x_dim) = x_dim {
        for num in numeric.iter().filter(|c| **c != x_dim) {
            out.push(suggestion(
                ChartType::Bar,
                x_dim,
                num,
                format!("{num} by {x_dim}"),
            ));
            if let Some(year) = year {
                out.push(suggestion(
                    ChartType::Line,
                    year,
                    num,
                    format!("{num} trend by {year}"),
                ));
            }
        }
    }

    let measure = numeric
        .iter()
        .find(|c| Some(**c) != year)
        .or(numeric.first());
    if let (Some(cat), Some(num)) = (categorical.first(), measure) {
        out.push(suggestion(
            ChartType::Pie,
            cat,
            num,
            format!("{num} share by {cat}"),
        ));
    }

    if out.is_empty() {
        out.push(ChartSpec::new(ChartType::Bar).with_title("Sample rows"));
    }

    out.truncate(top_n.max(1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn financials() -> Vec<Value> {
        vec![
            json!({"Company": "Acme", "Year": 2021, "Revenue": "1,200", "Income": 300}),
            json!({"Company": "Beta", "Year": 2022, "Revenue": 900, "Income": "n/a"}),
        ]
    }

    #[test]
    fn test_year_is_preferred_dimension() {
        let specs = suggest_charts(&financials(), 10);
        let titles: Vec<_> = specs.iter().filter_map(|s| s.title.clone()).collect();

        assert_eq!(
            titles,
            vec![
                "Revenue by Year",
                "Revenue trend by Year",
                "Income by Year",
                "Income trend by Year",
                "Revenue share by Company",
            ]
        );
        assert_eq!(specs[1].chart_type, ChartType::Line);
        assert_eq!(specs[0].drilldown_key.as_deref(), Some("Year"));
        assert_eq!(specs[4].chart_type, ChartType::Pie);
    }

    #[test]
    fn test_categorical_dimension_without_year() {
        let rows = vec![json!({"city": "Oslo", "temp": 4}), json!({"city": "Rome", "temp": 18})];
        let specs = suggest_charts(&rows, 5);

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].x.as_deref(), Some("city"));
        assert_eq!(specs[0].y.as_deref(), Some("temp"));
        assert_eq!(specs[1].chart_type, ChartType::Pie);
    }

    #[test]
    fn test_top_n_truncates_but_keeps_one() {
        assert_eq!(suggest_charts(&financials(), 2).len(), 2);
        assert_eq!(suggest_charts(&financials(), 0).len(), 1);
    }

    #[test]
    fn test_fallback_when_nothing_fits() {
        let specs = suggest_charts(&[json!({"note": "hello"})], 5);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].title.as_deref(), Some("Sample rows"));
        assert_eq!(specs[0].x, None);
    }
}
