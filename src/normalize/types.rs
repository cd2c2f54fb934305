//! Canonical shapes produced by the normalizer.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::coerce::coerce_field;
use crate::spec::ChartSpec;

/// Category label of a canonical row: a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Number(Number),
}

impl Label {
    /// Reads a label from JSON. `null` has no label; booleans and nested
    /// values are kept as their JSON text.
    pub fn from_value(value: &Value) -> Option<Label> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Label::Text(s.clone())),
            Value::Number(n) => Some(Label::Number(n.clone())),
            other => Some(Label::Text(other.to_string())),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Label::Text(s) => Value::String(s.clone()),
            Label::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(s) => f.write_str(s),
            Label::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One label/value pair. `value` is `None` when the source did not coerce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    pub label: Option<Label>,
    pub value: Option<f64>,
}

impl CanonicalRow {
    pub fn new(label: Option<Label>, value: Option<f64>) -> Self {
        Self { label, value }
    }

    pub fn from_values(label: &Value, value: Option<&Value>) -> Self {
        Self {
            label: Label::from_value(label),
            value: coerce_field(value),
        }
    }

    /// Plotted magnitude; missing values draw as zero.
    pub fn magnitude(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// Output of the normalizer, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalShape {
    Rows {
        rows: Vec<CanonicalRow>,
    },
    /// Wide format: one row per label, one column per series name.
    Table {
        series: Vec<String>,
        rows: Vec<Map<String, Value>>,
    },
    /// Row objects passed through untouched; see [`CanonicalShape::resolve_axes`].
    RawTable {
        table: Vec<Value>,
    },
    Unknown,
    Empty,
}

impl CanonicalShape {
    pub fn kind(&self) -> &'static str {
        match self {
            CanonicalShape::Rows { .. } => "rows",
            CanonicalShape::Table { .. } => "table",
            CanonicalShape::RawTable { .. } => "raw_table",
            CanonicalShape::Unknown => "unknown",
            CanonicalShape::Empty => "empty",
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            CanonicalShape::Rows { rows } => rows.len(),
            CanonicalShape::Table { rows, .. } => rows.len(),
            CanonicalShape::RawTable { table } => table.len(),
            CanonicalShape::Unknown | CanonicalShape::Empty => 0,
        }
    }

    pub fn rows(&self) -> Option<&[CanonicalRow]> {
        match self {
            CanonicalShape::Rows { rows } => Some(rows),
            _ => None,
        }
    }

    /// Picks the two axis fields of a row table: the spec's `x`/`y` when both
    /// are set, otherwise the first two field names of the first row.
    pub fn resolve_axes(table: &[Value], spec: &ChartSpec) -> Option<(String, String)> {
        if let (Some(x), Some(y)) = (&spec.x, &spec.y) {
            return Some((x.clone(), y.clone()));
        }

        let first = table.first()?.as_object()?;
        let mut keys = first.keys();
        let x = keys.next()?;
        let y = keys.next()?;
        Some((x.clone(), y.clone()))
    }
}

/// Projects row objects onto `x`/`y`. Non-object entries become empty rows.
pub fn records_to_rows(records: &[Value], x: &str, y: &str) -> Vec<CanonicalRow> {
    records
        .iter()
        .map(|record| match record.as_object() {
            Some(obj) => CanonicalRow::from_values(obj.get(x).unwrap_or(&Value::Null), obj.get(y)),
            None => CanonicalRow::new(None, None),
        })
        .collect()
}
