//! Numeric coercion shared by the normalizer, the insight engine and the
//! aggregation builder.
//!
//! Everything that decides whether a loosely-typed value "is a number" goes
//! through [`coerce_number`], so a value dropped from statistics is also the
//! value that renders as zero.

use serde_json::Value;

/// Coerces a JSON value into a finite `f64`.
///
/// - numbers map to themselves
/// - strings have thousands-separator commas stripped and are trimmed before
///   parsing; empty or non-numeric strings yield `None`
/// - `null`, booleans, arrays and objects yield `None`
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_str(s),
        _ => None,
    }
}

/// String half of [`coerce_number`].
pub fn coerce_str(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }

    // f64::from_str accepts "NaN" and "inf", neither of which is a plottable number
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces an optional field lookup, treating a missing field like `null`.
pub fn coerce_field(value: Option<&Value>) -> Option<f64> {
    value.and_then(coerce_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_thousands_separators() {
        assert_eq!(coerce_number(&json!("1,234.5")), Some(1234.5));
        assert_eq!(coerce_number(&json!("1,000,000")), Some(1_000_000.0));
    }

    #[test]
    fn test_empty_and_null_are_none() {
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("   ")), None);
        assert_eq!(coerce_number(&Value::Null), None);
        assert_eq!(coerce_field(None), None);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(coerce_number(&json!(42)), Some(42.0));
        assert_eq!(coerce_number(&json!(-3.25)), Some(-3.25));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(coerce_number(&json!("  17 ")), Some(17.0));
        assert_eq!(coerce_str("\t-8.5\n"), Some(-8.5));
    }

    #[test]
    fn test_non_numeric_content() {
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("12abc")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!([1])), None);
        assert_eq!(coerce_number(&json!({"v": 1})), None);
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(coerce_str("1e3"), Some(1000.0));
    }
}
