//! Template sentences for insight summaries.

use super::types::Trend;
use crate::normalize::Label;

/// Numbers the narrative needs, already computed.
pub struct NarrativeInput<'a> {
    pub metric: &'a str,
    pub mean: f64,
    pub std: f64,
    pub max: f64,
    pub min: f64,
    pub max_label: Option<&'a Label>,
    pub min_label: Option<&'a Label>,
    pub trend: Trend,
    pub has_high: bool,
    pub has_low: bool,
}

impl NarrativeInput<'_> {
    fn high_label(&self) -> String {
        self.max_label
            .map_or_else(|| "the highest period".to_string(), Label::to_string)
    }

    fn low_label(&self) -> String {
        self.min_label
            .map_or_else(|| "the lowest period".to_string(), Label::to_string)
    }
}

pub fn analysis_text(input: &NarrativeInput) -> String {
    let metric = input.metric;
    [
        format!(
            "The highest {metric} is in **{}** ({}).",
            input.high_label(),
            format_grouped(input.max)
        ),
        format!(
            "The lowest {metric} is in **{}** ({}).",
            input.low_label(),
            format_grouped(input.min)
        ),
        format!(
            "The average {metric} is about {} with variation ~{}.",
            format_grouped(input.mean),
            format_grouped(input.std)
        ),
        format!(
            "Overall, the trend looks **{}** over time.",
            input.trend.describe()
        ),
    ]
    .join(" ")
}

/// Trend advice first, then high-outlier and low-outlier notes when present.
pub fn recommendations(input: &NarrativeInput) -> Vec<String> {
    let subject = capitalize(input.metric);
    let mut out = Vec::with_capacity(3);

    out.push(match input.trend {
        Trend::Increasing => format!(
            "{subject} is increasing. Put a limit or budget on the highest periods like {}.",
            input.high_label()
        ),
        Trend::Decreasing => format!(
            "{subject} is decreasing. Try to keep the same pattern by repeating what you did in periods like {}.",
            input.low_label()
        ),
        Trend::Stable => format!(
            "{subject} is stable. You can set your default target close to the average ({}).",
            format_grouped(input.mean)
        ),
    });

    if input.has_high {
        out.push(format!(
            "Focus on reducing {} in the highlighted high periods because they are far above the average.",
            input.metric
        ));
    }

    if input.has_low {
        out.push(format!(
            "Review the highlighted low periods such as {} because they fall well below the average.",
            input.low_label()
        ));
    }

    out
}

/// Rounds to a whole number and inserts thousands separators.
pub fn format_grouped(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && digits != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(trend: Trend) -> NarrativeInput<'static> {
        NarrativeInput {
            metric: "revenue",
            mean: 1500.0,
            std: 250.4,
            max: 2100.0,
            min: 900.0,
            max_label: None,
            min_label: None,
            trend,
            has_high: false,
            has_low: false,
        }
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.2), "1,234,567");
        assert_eq!(format_grouped(-98765.0), "-98,765");
        assert_eq!(format_grouped(-0.2), "0");
    }

    #[test]
    fn test_analysis_text_uses_fallback_labels() {
        let text = analysis_text(&input(Trend::Stable));
        assert!(text.contains("The highest revenue is in **the highest period** (2,100)."));
        assert!(text.contains("The lowest revenue is in **the lowest period** (900)."));
        assert!(text.contains("about 1,500 with variation ~250."));
        assert!(text.ends_with("the trend looks **relatively stable** over time."));
    }

    #[test]
    fn test_recommendations_order() {
        let label = Label::Text("March".into());
        let mut inp = input(Trend::Decreasing);
        inp.min_label = Some(&label);
        inp.has_high = true;
        inp.has_low = true;

        let recs = recommendations(&inp);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("Revenue is decreasing."));
        assert!(recs[0].ends_with("periods like March."));
        assert!(recs[1].starts_with("Focus on reducing revenue"));
        assert!(recs[2].contains("such as March"));
    }

    #[test]
    fn test_stable_recommendation_mentions_average() {
        let recs = recommendations(&input(Trend::Stable));
        assert_eq!(
            recs,
            vec!["Revenue is stable. You can set your default target close to the average (1,500).".to_string()]
        );
    }
}
