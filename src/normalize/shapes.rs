//! Structural predicates and builders for each accepted payload shape.
//!
//! Each predicate only inspects field presence and JSON types; the matching
//! builder may assume the predicate held.

use serde_json::{Map, Value, json};

use super::types::{CanonicalRow, CanonicalShape, Label};
use crate::coerce::coerce_field;

const LABEL_KEYS: &[&str] = &["label", "name", "x"];
const VALUE_KEYS: &[&str] = &["value", "y"];

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn array_field<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(Value::as_array)
}

// [{label|name|x, value|y}, ...]

pub(super) fn is_row_objects(payload: &Value) -> bool {
    let Some(items) = payload.as_array() else {
        return false;
    };

    items.iter().all(|item| {
        item.as_object().is_some_and(|obj| {
            first_present(obj, LABEL_KEYS).is_some() && first_present(obj, VALUE_KEYS).is_some()
        })
    })
}

pub(super) fn build_row_objects(payload: &Value) -> CanonicalShape {
    let rows = payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|obj| {
                    CanonicalRow::from_values(
                        first_present(obj, LABEL_KEYS).unwrap_or(&Value::Null),
                        first_present(obj, VALUE_KEYS),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    CanonicalShape::Rows { rows }
}

// {labels: [...], values: [...]}

pub(super) fn is_labels_values(payload: &Value) -> bool {
    array_field(payload, "labels").is_some() && array_field(payload, "values").is_some()
}

pub(super) fn build_labels_values(payload: &Value) -> CanonicalShape {
    let (Some(labels), Some(values)) = (array_field(payload, "labels"), array_field(payload, "values"))
    else {
        return CanonicalShape::Unknown;
    };

    let rows = labels
        .iter()
        .enumerate()
        .map(|(i, label)| CanonicalRow::from_values(label, values.get(i)))
        .collect();

    CanonicalShape::Rows { rows }
}

// {labels: [...], series: [{name, values: [...]}, ...]}

pub(super) fn is_labels_series(payload: &Value) -> bool {
    array_field(payload, "labels").is_some() && array_field(payload, "series").is_some()
}

pub(super) fn build_labels_series(payload: &Value) -> CanonicalShape {
    let (Some(labels), Some(series)) = (array_field(payload, "labels"), array_field(payload, "series"))
    else {
        return CanonicalShape::Unknown;
    };

    let columns: Vec<(String, &[Value])> = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let name = s
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("series_{}", i + 1));
            let values = array_field(s, "values").map(Vec::as_slice).unwrap_or(&[]);
            (name, values)
        })
        .collect();

    let rows = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut row = Map::new();
            row.insert(
                "label".to_string(),
                Label::from_value(label).map_or(Value::Null, |l| l.to_value()),
            );
            // short series leave a null tail
            for (name, values) in &columns {
                row.insert(name.clone(), json!(coerce_field(values.get(i))));
            }
            row
        })
        .collect();

    CanonicalShape::Table {
        series: columns.into_iter().map(|(name, _)| name).collect(),
        rows,
    }
}

// {raw_table: [{...}, ...]}

pub(super) fn is_raw_table(payload: &Value) -> bool {
    array_field(payload, "raw_table").is_some()
}

pub(super) fn build_raw_table(payload: &Value) -> CanonicalShape {
    CanonicalShape::RawTable {
        table: array_field(payload, "raw_table").cloned().unwrap_or_default(),
    }
}

// {x: [...], y: [...]} of equal length

pub(super) fn is_parallel_xy(payload: &Value) -> bool {
    match (array_field(payload, "x"), array_field(payload, "y")) {
        (Some(x), Some(y)) => x.len() == y.len(),
        _ => false,
    }
}

pub(super) fn build_parallel_xy(payload: &Value) -> CanonicalShape {
    let (Some(xs), Some(ys)) = (array_field(payload, "x"), array_field(payload, "y")) else {
        return CanonicalShape::Unknown;
    };

    let rows = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| CanonicalRow::from_values(x, Some(y)))
        .collect();

    CanonicalShape::Rows { rows }
}

// {chart_spec: {...}, aggregated: ...}

pub(super) fn is_wrapped(payload: &Value) -> bool {
    payload
        .as_object()
        .is_some_and(|obj| obj.contains_key("chart_spec") && obj.contains_key("aggregated"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_objects_requires_both_fields() {
        assert!(is_row_objects(&json!([{"label": "A", "value": 1}, {"name": "B", "y": 2}])));
        assert!(!is_row_objects(&json!([{"label": "A"}])));
        assert!(!is_row_objects(&json!([{"label": "A", "value": 1}, 3])));
        assert!(!is_row_objects(&json!({"label": "A", "value": 1})));
    }

    #[test]
    fn test_row_objects_label_precedence() {
        let shape = build_row_objects(&json!([{"x": "from-x", "name": "from-name", "value": 1}]));
        let rows = shape.rows().unwrap();
        assert_eq!(rows[0].label, Some(Label::Text("from-name".into())));
    }

    #[test]
    fn test_labels_values_pads_missing_values() {
        let shape = build_labels_values(&json!({"labels": ["a", "b", "c"], "values": [1, "2"]}));
        let values: Vec<_> = shape.rows().unwrap().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), None]);
    }

    #[test]
    fn test_parallel_xy_needs_equal_length() {
        assert!(is_parallel_xy(&json!({"x": [1, 2], "y": [3, 4]})));
        assert!(!is_parallel_xy(&json!({"x": [1, 2], "y": [3]})));
        assert!(!is_parallel_xy(&json!({"x": [1, 2]})));
    }

    #[test]
    fn test_series_without_name_gets_positional_name() {
        let shape = build_labels_series(&json!({"labels": ["a"], "series": [{"values": [5]}]}));
        match shape {
            CanonicalShape::Table { series, rows } => {
                assert_eq!(series, vec!["series_1".to_string()]);
                assert_eq!(rows[0]["series_1"], json!(5.0));
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_wrapped_needs_both_keys() {
        assert!(is_wrapped(&json!({"chart_spec": {}, "aggregated": null})));
        assert!(!is_wrapped(&json!({"aggregated": []})));
    }
}
