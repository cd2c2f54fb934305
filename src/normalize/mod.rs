//! Aggregation payload normalization.
//!
//! The query service answers with one of several loosely-typed payload
//! shapes. [`normalize`] walks a fixed, ordered table of shape rules and
//! returns the canonical shape built by the first rule whose structural check
//! passes. Later rules are never consulted once one matches, even when the
//! result turns out to hold no usable values.
//!
//! Normalization never fails: unrecognized payloads become
//! [`CanonicalShape::Unknown`], absent payloads [`CanonicalShape::Empty`].

mod shapes;
pub mod types;

pub use types::{CanonicalRow, CanonicalShape, Label, records_to_rows};

use serde_json::Value;
use tracing::{debug, warn};

use crate::spec::ChartSpec;

/// Nesting limit for `{chart_spec, aggregated}` wrappers.
const MAX_WRAPPER_DEPTH: usize = 32;

struct ShapeRule {
    name: &'static str,
    matches: fn(&Value) -> bool,
    build: fn(&Value) -> CanonicalShape,
}

/// Shape rules in priority order. The `{chart_spec, aggregated}` wrapper is
/// unwrapped after these in [`normalize_unwrapped`].
static SHAPE_RULES: &[ShapeRule] = &[
    ShapeRule {
        name: "row_objects",
        matches: shapes::is_row_objects,
        build: shapes::build_row_objects,
    },
    ShapeRule {
        name: "labels_values",
        matches: shapes::is_labels_values,
        build: shapes::build_labels_values,
    },
    ShapeRule {
        name: "labels_series",
        matches: shapes::is_labels_series,
        build: shapes::build_labels_series,
    },
    ShapeRule {
        name: "raw_table",
        matches: shapes::is_raw_table,
        build: shapes::build_raw_table,
    },
    ShapeRule {
        name: "parallel_xy",
        matches: shapes::is_parallel_xy,
        build: shapes::build_parallel_xy,
    },
];

/// Normalizes a payload against a raw JSON chart spec. `Value::Null` stands
/// for an absent payload or spec.
pub fn normalize(payload: &Value, spec: &Value) -> CanonicalShape {
    normalize_unwrapped(payload, ChartSpec::from_value(spec)).0
}

/// Normalizes a payload against an already-parsed chart spec.
pub fn normalize_with(payload: &Value, spec: &ChartSpec) -> CanonicalShape {
    normalize_unwrapped(payload, spec.clone()).0
}

/// Normalizes a payload and also returns the spec in effect: the innermost
/// `chart_spec` when the payload was a `{chart_spec, aggregated}` wrapper,
/// otherwise `spec` itself.
pub fn normalize_unwrapped(payload: &Value, spec: ChartSpec) -> (CanonicalShape, ChartSpec) {
    let mut payload = payload;
    let mut spec = spec;

    for depth in 0..=MAX_WRAPPER_DEPTH {
        if let Some(rule) = SHAPE_RULES.iter().find(|rule| (rule.matches)(payload)) {
            let shape = (rule.build)(payload);
            debug!(rule = rule.name, kind = shape.kind(), depth, "Payload shape matched");
            return (shape, spec);
        }

        if shapes::is_wrapped(payload) {
            debug!(depth, "Unwrapping nested chart_spec/aggregated payload");
            spec = ChartSpec::from_value(&payload["chart_spec"]);
            payload = &payload["aggregated"];
            continue;
        }

        if payload.is_null() {
            return (spec_data_rows(&spec), spec);
        }

        debug!("Payload matched no known shape");
        return (CanonicalShape::Unknown, spec);
    }

    warn!(max_depth = MAX_WRAPPER_DEPTH, "Aggregation wrapper nested too deeply");
    (CanonicalShape::Unknown, spec)
}

/// Fallback for an absent payload: the spec's inline `data` rows.
fn spec_data_rows(spec: &ChartSpec) -> CanonicalShape {
    let Some(data) = spec.data.as_deref() else {
        return CanonicalShape::Empty;
    };

    match CanonicalShape::resolve_axes(data, spec) {
        Some((x, y)) => {
            debug!(x = %x, y = %y, rows = data.len(), "Using inline spec data");
            CanonicalShape::Rows {
                rows: records_to_rows(data, &x, &y),
            }
        }
        None => CanonicalShape::Empty,
    }
}
