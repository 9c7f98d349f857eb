//! Pure mapping from a [`ClassificationResult`] to the views shown after a
//! job completes. Nothing here touches an output surface.

pub mod confusion_matrix;
pub mod distribution;
pub mod predictions;
pub mod report;

use crate::config::PREDICTION_DISPLAY_LIMIT;
use crate::models::classify_types::ClassificationResult;
use crate::models::view_types::{ChartSeries, DistributionView, ResultsView, SummaryView};
use crate::services::metric_format::format_number;
use std::collections::HashSet;
use tracing::debug;

/// The live distribution chart. Only [`ResultRenderer`] creates or holds one.
#[derive(Debug, PartialEq)]
pub struct ChartHandle {
    id: u64,
    series: ChartSeries,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }
}

#[derive(Debug)]
pub struct ResultRenderer {
    prediction_limit: usize,
    chart: Option<ChartHandle>,
    next_chart_id: u64,
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self::new(PREDICTION_DISPLAY_LIMIT)
    }
}

impl ResultRenderer {
    pub fn new(prediction_limit: usize) -> Self {
        Self {
            prediction_limit,
            chart: None,
            next_chart_id: 1,
        }
    }

    /// Builds every view for `result`. Any chart from a previous render is
    /// disposed before the new one is created.
    pub fn render(&mut self, result: &ClassificationResult) -> ResultsView {
        self.dispose();

        let distribution = distribution::distribution_view(&result.distribution);
        if let DistributionView::Chart(series) = &distribution {
            let id = self.next_chart_id;
            self.next_chart_id += 1;
            debug!(chart_id = id, slices = series.slices.len(), "creating distribution chart");
            self.chart = Some(ChartHandle {
                id,
                series: series.clone(),
            });
        }

        ResultsView {
            summary: summary_view(result),
            distribution,
            traffic_summary: distribution::traffic_summary(&result.distribution, result.num_samples),
            predictions: predictions::prediction_table(
                &result.predictions,
                &result.confidence_scores,
                self.prediction_limit,
            ),
            report: report::report_view(result.classification_report.as_ref()),
            confusion_matrix: confusion_matrix::confusion_matrix_view(
                result.confusion_matrix_img.as_deref(),
            ),
        }
    }

    /// Releases the live chart, if any. Returns whether one was released.
    pub fn dispose(&mut self) -> bool {
        match self.chart.take() {
            Some(chart) => {
                debug!(chart_id = chart.id, "disposing distribution chart");
                true
            }
            None => false,
        }
    }

    pub fn live_chart(&self) -> Option<&ChartHandle> {
        self.chart.as_ref()
    }
}

pub fn summary_view(result: &ClassificationResult) -> SummaryView {
    SummaryView {
        num_samples: format_number(result.num_samples),
        file_size: format!("{:.2} MB", result.file_size_mb),
        processing_time: format!("{:.2} seconds", result.processing_time),
        device_used: result.device_used.clone(),
        pseudo_label_clusters: result
            .pseudo_labels
            .as_ref()
            .map(|labels| labels.iter().collect::<HashSet<_>>().len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::view_types::{ConfusionMatrixView, PredictionsView, ReportView};

    fn result(distribution: &[(&str, u64)]) -> ClassificationResult {
        let total: u64 = distribution.iter().map(|(_, c)| c).sum();
        let predictions: Vec<String> = distribution
            .iter()
            .flat_map(|&(label, count)| std::iter::repeat(label.to_string()).take(count as usize))
            .collect();
        ClassificationResult {
            num_samples: total,
            file_size_mb: 1.23456,
            processing_time: 4.5,
            device_used: "/GPU:0".into(),
            distribution: distribution.iter().map(|&(k, v)| (k, v)).collect(),
            confidence_scores: vec![0.75; predictions.len()],
            predictions,
            confusion_matrix_img: None,
            classification_report: None,
            pseudo_labels: Some(vec![0, 1, 1, 4]),
        }
    }

    #[test]
    fn summary_formatting() {
        let mut r = result(&[("chat", 1200), ("voip", 34)]);
        r.num_samples = 1234;
        let summary = summary_view(&r);
        assert_eq!(summary.num_samples, "1,234");
        assert_eq!(summary.file_size, "1.23 MB");
        assert_eq!(summary.processing_time, "4.50 seconds");
        assert_eq!(summary.device_used, "/GPU:0");
        assert_eq!(summary.pseudo_label_clusters, Some(3));
    }

    #[test]
    fn render_builds_all_views() {
        let mut renderer = ResultRenderer::default();
        let view = renderer.render(&result(&[("chat", 70), ("voip", 30)]));

        assert!(matches!(view.distribution, DistributionView::Chart(_)));
        assert_eq!(view.traffic_summary.len(), 2);
        assert!(matches!(view.predictions, PredictionsView::Table { ref rows, .. } if rows.len() == 20));
        assert_eq!(view.report, ReportView::Placeholder);
        assert_eq!(view.confusion_matrix, ConfusionMatrixView::Placeholder);
        assert!(renderer.live_chart().is_some());
    }

    #[test]
    fn rerender_replaces_chart() {
        let mut renderer = ResultRenderer::default();
        renderer.render(&result(&[("chat", 70), ("voip", 30)]));
        let first = renderer.live_chart().unwrap().id();

        renderer.render(&result(&[("email", 5), ("file", 1)]));
        let second = renderer.live_chart().unwrap();
        assert_ne!(second.id(), first);
        assert_eq!(second.series().slices[0].label, "email");
    }

    #[test]
    fn degenerate_render_leaves_no_chart() {
        let mut renderer = ResultRenderer::default();
        renderer.render(&result(&[("chat", 70), ("voip", 30)]));
        renderer.render(&result(&[("chat", 5), ("voip", 5)]));
        assert!(renderer.live_chart().is_none());
    }

    #[test]
    fn dispose_reports_release() {
        let mut renderer = ResultRenderer::default();
        assert!(!renderer.dispose());
        renderer.render(&result(&[("chat", 2), ("voip", 1)]));
        assert!(renderer.dispose());
        assert!(renderer.live_chart().is_none());
    }
}
