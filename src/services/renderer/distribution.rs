use crate::models::classify_types::OrderedMap;
use crate::models::view_types::{ChartSeries, ChartSlice, DistributionView, TrafficBar};
use crate::services::metric_format::{format_fixed, percentage_of};

pub const DEGENERATE_NOTICE: &str =
    "Traffic distribution data is not available or uniform across all classes.";

/// Donut slice colors, cycled by position.
const CHART_PALETTE: [&str; 5] = [
    "rgba(78, 115, 223, 0.8)",
    "rgba(28, 200, 138, 0.8)",
    "rgba(54, 185, 204, 0.8)",
    "rgba(246, 194, 62, 0.8)",
    "rgba(231, 74, 59, 0.8)",
];

const FALLBACK_BAR_COLOR: &str = "#6c757d";

pub fn bar_color(label: &str) -> &'static str {
    match label {
        "chat" => "#4e73df",
        "email" => "#1cc88a",
        "file" => "#36b9cc",
        "streaming" => "#f6c23e",
        "voip" => "#e74a3b",
        _ => FALLBACK_BAR_COLOR,
    }
}

/// Donut chart over the distribution, or a notice when the chart would be
/// empty or show identical slices.
pub fn distribution_view(distribution: &OrderedMap<u64>) -> DistributionView {
    let total: u64 = distribution.values().sum();
    let first = distribution.values().next();
    let all_same = distribution.values().all(|count| Some(count) == first);

    if total == 0 || all_same {
        return DistributionView::Degenerate {
            notice: DEGENERATE_NOTICE.to_string(),
        };
    }

    let slices = distribution
        .iter()
        .enumerate()
        .map(|(i, (label, &count))| {
            let percentage = percentage_of(count as f64, total as f64);
            ChartSlice {
                label: label.to_string(),
                count,
                percentage,
                tooltip: format!("{}: {} ({}%)", label, count, format_fixed(percentage, 1)),
                color: CHART_PALETTE[i % CHART_PALETTE.len()],
            }
        })
        .collect();

    DistributionView::Chart(ChartSeries { total, slices })
}

/// One bar per label, measured against the number of samples in the file.
pub fn traffic_summary(distribution: &OrderedMap<u64>, num_samples: u64) -> Vec<TrafficBar> {
    distribution
        .iter()
        .map(|(label, &count)| {
            let percentage = percentage_of(count as f64, num_samples as f64);
            TrafficBar {
                label: label.to_uppercase(),
                count,
                percentage,
                percentage_text: format_fixed(percentage, 1),
                color: bar_color(label),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> OrderedMap<u64> {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn uniform_distribution_is_degenerate() {
        let view = distribution_view(&counts(&[("a", 10), ("b", 10), ("c", 10)]));
        assert_eq!(
            view,
            DistributionView::Degenerate {
                notice: DEGENERATE_NOTICE.to_string()
            }
        );
    }

    #[test]
    fn empty_distribution_is_degenerate() {
        assert!(matches!(
            distribution_view(&counts(&[("a", 0), ("b", 0)])),
            DistributionView::Degenerate { .. }
        ));
        assert!(matches!(
            distribution_view(&OrderedMap::new()),
            DistributionView::Degenerate { .. }
        ));
    }

    #[test]
    fn single_class_is_degenerate() {
        assert!(matches!(
            distribution_view(&counts(&[("chat", 42)])),
            DistributionView::Degenerate { .. }
        ));
    }

    #[test]
    fn chart_percentages_against_category_total() {
        let DistributionView::Chart(series) = distribution_view(&counts(&[("a", 70), ("b", 30)])) else {
            panic!("expected a chart");
        };
        assert_eq!(series.total, 100);
        let tooltips: Vec<&str> = series.slices.iter().map(|s| s.tooltip.as_str()).collect();
        assert_eq!(tooltips, ["a: 70 (70.0%)", "b: 30 (30.0%)"]);
        assert_eq!(series.slices[0].color, CHART_PALETTE[0]);
        assert_eq!(series.slices[1].color, CHART_PALETTE[1]);
    }

    #[test]
    fn palette_cycles_after_five_slices() {
        let dist = counts(&[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5), ("f", 6)]);
        let DistributionView::Chart(series) = distribution_view(&dist) else {
            panic!("expected a chart");
        };
        assert_eq!(series.slices[5].color, series.slices[0].color);
    }

    #[test]
    fn summary_uses_sample_count_and_label_colors() {
        let bars = traffic_summary(&counts(&[("chat", 3), ("gaming", 1)]), 8);
        assert_eq!(bars[0].label, "CHAT");
        assert_eq!(bars[0].percentage_text, "37.5");
        assert_eq!(bars[0].color, "#4e73df");
        assert_eq!(bars[1].percentage_text, "12.5");
        assert_eq!(bars[1].color, FALLBACK_BAR_COLOR);
    }

    #[test]
    fn summary_without_samples_shows_zero() {
        let bars = traffic_summary(&counts(&[("chat", 0)]), 0);
        assert_eq!(bars[0].percentage, 0.0);
        assert_eq!(bars[0].percentage_text, "0.0");
    }
}
