//! Click-to-refine support.
//!
//! When a spec names a `drilldownKey`, selecting a plotted element asks the
//! query service for a narrower view filtered on that key. This module only
//! derives what to report; event wiring belongs to the renderer.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::normalize::Label;
use crate::spec::ChartSpec;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drilldown {
    pub key: String,
    pub value: Label,
}

impl Drilldown {
    /// Single-entry filter object `{key: value}` for the re-query.
    pub fn to_filter(&self) -> Value {
        let mut filter = Map::new();
        filter.insert(self.key.clone(), self.value.to_value());
        Value::Object(filter)
    }
}

/// Returns the refinement for a clicked label, if the spec enables drilldown
/// and the element has a label.
pub fn drilldown_for(spec: &ChartSpec, label: Option<&Label>) -> Option<Drilldown> {
    let key = spec.drilldown_key.as_deref().filter(|k| !k.is_empty())?;
    Some(Drilldown {
        key: key.to_string(),
        value: label?.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requires_drilldown_key() {
        let label = Label::Text("EU".into());
        assert_eq!(drilldown_for(&ChartSpec::default(), Some(&label)), None);
    }

    #[test]
    fn test_requires_label() {
        let spec = ChartSpec::default().with_drilldown("region");
        assert_eq!(drilldown_for(&spec, None), None);
    }

    #[test]
    fn test_filter_object() {
        let spec = ChartSpec::default().with_drilldown("year");
        let label = Label::from_value(&json!(2021)).unwrap();
        let target = drilldown_for(&spec, Some(&label)).unwrap();

        assert_eq!(target.key, "year");
        assert_eq!(target.to_filter(), json!({"year": 2021}));
    }
}
