//! Builds `{labels, values, raw_table}` aggregation payloads from row objects.
//!
//! This is the producer side of the payload the normalizer consumes: rows
//! are grouped by the spec's `x` field and the `y` field is reduced per group.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::{Map, Number, Value, json};
use tracing::debug;

use crate::coerce::coerce_field;
use crate::spec::{Aggregation, ChartSpec, ChartType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedPayload {
    pub labels: Vec<Value>,
    pub values: Vec<Option<f64>>,
    pub raw_table: Vec<Map<String, Value>>,
}

impl AggregatedPayload {
    pub fn to_value(&self) -> Value {
        json!({
            "labels": self.labels,
            "values": self.values,
            "raw_table": self.raw_table,
        })
    }
}

/// Group key: numbers sort before text, numbers by value, text lexically.
#[derive(Debug, Clone)]
enum GroupKey {
    Number(Number),
    Text(String),
}

impl GroupKey {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(GroupKey::Number(n.clone())),
            Value::String(s) => Some(GroupKey::Text(s.clone())),
            other => Some(GroupKey::Text(other.to_string())),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            GroupKey::Number(n) => Value::Number(n.clone()),
            GroupKey::Text(s) => Value::String(s.clone()),
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    valid: usize,
}

impl Accumulator {
    fn finish(&self, agg: Aggregation) -> Option<f64> {
        match agg {
            Aggregation::Sum => Some(self.sum),
            Aggregation::Mean if self.valid == 0 => None,
            Aggregation::Mean => Some(self.sum / self.valid as f64),
            Aggregation::Count => Some(self.valid as f64),
        }
    }
}

fn has_column(rows: &[Value], key: &str) -> bool {
    rows.iter()
        .any(|row| row.as_object().is_some_and(|obj| obj.contains_key(key)))
}

/// Aggregates `rows` for `spec`.
///
/// Histograms count occurrences of `x`; every other chart type groups by `x`
/// and reduces `y` with the spec's aggregation. Rows with a null `x` are
/// dropped.
///
/// # Errors
///
/// Returns an error when the spec's axis fields are absent from the rows.
pub fn aggregate_for_chart(rows: &[Value], spec: &ChartSpec) -> Result<AggregatedPayload> {
    let x = spec.x.as_deref().filter(|x| has_column(rows, x));
    let y = spec.y.as_deref().filter(|y| has_column(rows, y));

    match (spec.chart_type, x, y) {
        (ChartType::Histogram, Some(x), _) => Ok(value_counts(rows, x)),
        (_, Some(x), Some(y)) => Ok(group_by(rows, x, y, spec.agg)),
        _ => bail!(
            "Cannot aggregate {:?} chart: missing x/y columns (x={:?}, y={:?})",
            spec.chart_type,
            spec.x,
            spec.y
        ),
    }
}

fn value_counts(rows: &[Value], x: &str) -> AggregatedPayload {
    let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();
    for row in rows {
        if let Some(key) = row.get(x).and_then(GroupKey::from_value) {
            *counts.entry(key).or_default() += 1;
        }
    }

    debug!(x, groups = counts.len(), "Counted histogram values");

    let mut out = AggregatedPayload::default();
    for (key, count) in counts {
        let label = key.to_value();
        let mut record = Map::new();
        record.insert(x.to_string(), label.clone());
        record.insert("count".to_string(), json!(count));

        out.labels.push(label);
        out.values.push(Some(count as f64));
        out.raw_table.push(record);
    }
    out
}

fn group_by(rows: &[Value], x: &str, y: &str, agg: Aggregation) -> AggregatedPayload {
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for row in rows {
        let Some(key) = row.get(x).and_then(GroupKey::from_value) else {
            continue;
        };
        let acc = groups.entry(key).or_default();
        if let Some(v) = coerce_field(row.get(y)) {
            acc.sum += v;
            acc.valid += 1;
        }
    }

    debug!(x, y, ?agg, groups = groups.len(), "Grouped rows");

    let mut out = AggregatedPayload::default();
    for (key, acc) in groups {
        let label = key.to_value();
        let value = acc.finish(agg);
        let mut record = Map::new();
        record.insert(x.to_string(), label.clone());
        record.insert(y.to_string(), json!(value));

        out.labels.push(label);
        out.values.push(value);
        out.raw_table.push(record);
    }
    out
}
