use super::types::ConfidenceLevel;
use crate::config::InsightConfig;

/// Rates how much weight an insight deserves from its sample size alone.
///
/// | Valid values               | Level  |
/// |----------------------------|--------|
/// | >= `high_confidence_min`   | high   |
/// | >= `medium_confidence_min` | medium |
/// | otherwise                  | low    |
///
/// This is a coarse sample-size heuristic, not a confidence interval.
pub fn confidence(valid_values: usize, config: &InsightConfig) -> ConfidenceLevel {
    match valid_values {
        n if n >= config.high_confidence_min => ConfidenceLevel::High,
        n if n >= config.medium_confidence_min => ConfidenceLevel::Medium,
        _ => ConfidenceLevel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_boundaries() {
        let config = InsightConfig::default();
        assert_eq!(confidence(25, &config), ConfidenceLevel::High);
        assert_eq!(confidence(10, &config), ConfidenceLevel::High);
        assert_eq!(confidence(9, &config), ConfidenceLevel::Medium);
        assert_eq!(confidence(5, &config), ConfidenceLevel::Medium);
        assert_eq!(confidence(4, &config), ConfidenceLevel::Low);
        assert_eq!(confidence(0, &config), ConfidenceLevel::Low);
    }
}
