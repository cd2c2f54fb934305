use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the insight engine.
///
/// Stored as a plain JSON object on disk; omitted fields keep their defaults:
/// ```json
/// {
///   "outlier_band": 0.7,
///   "trend_threshold": 0.01,
///   "high_confidence_min": 10,
///   "medium_confidence_min": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Multiple of the standard deviation beyond the mean that marks a
    /// value high or low. A loose visual band, not a significance test.
    pub outlier_band: f64,
    /// Fraction of the mean the slope must exceed to count as a trend.
    pub trend_threshold: f64,
    /// Minimum valid values for a `high` confidence rating.
    pub high_confidence_min: usize,
    /// Minimum valid values for a `medium` confidence rating.
    pub medium_confidence_min: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            outlier_band: 0.7,
            trend_threshold: 0.01,
            high_confidence_min: 10,
            medium_confidence_min: 5,
        }
    }
}

impl InsightConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read insight config '{path}'"))?;
        let config: InsightConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid insight config '{path}'"))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = format!("{}/chartlens_test_config.json", env::temp_dir().display());
        fs::write(&path, r#"{"outlier_band": 1.5}"#).unwrap();

        let config = InsightConfig::load(&path).unwrap();
        assert_eq!(config.outlier_band, 1.5);
        assert_eq!(config.trend_threshold, 0.01);
        assert_eq!(config.high_confidence_min, 10);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(InsightConfig::load("/nonexistent/chartlens.json").is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(
            InsightConfig::load_or_default(None).unwrap(),
            InsightConfig::default()
        );
    }
}
