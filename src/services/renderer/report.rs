use crate::models::classify_types::{ClassMetrics, OrderedMap, ReportEntry, AGGREGATE_KEYS};
use crate::models::view_types::{ReportRow, ReportView};
use crate::services::metric_format::format_metric_value;

pub fn report_view(report: Option<&OrderedMap<ReportEntry>>) -> ReportView {
    let Some(report) = report else {
        return ReportView::Placeholder;
    };

    let mut rows: Vec<ReportRow> = report
        .iter()
        .filter(|(key, _)| !AGGREGATE_KEYS.iter().any(|agg| agg == key))
        .map(|(key, entry)| {
            let metrics = entry.metrics().cloned().unwrap_or_default();
            ReportRow::Class {
                name: key.to_string(),
                precision: format_metric_value(metrics.precision),
                recall: format_metric_value(metrics.recall),
                f1_score: format_metric_value(metrics.f1_score),
                support: support_text(metrics.support),
            }
        })
        .collect();

    let macro_avg = report.get("macro avg").and_then(ReportEntry::metrics);
    let weighted_avg = report.get("weighted avg").and_then(ReportEntry::metrics);

    if let (Some(macro_avg), Some(weighted_avg)) = (macro_avg, weighted_avg) {
        rows.push(ReportRow::Separator);

        if let Some(accuracy) = report.get("accuracy") {
            rows.push(ReportRow::Accuracy {
                value: format_metric_value(accuracy.accuracy_value()),
                support: support_text(macro_avg.support),
            });
        }

        rows.push(aggregate_row("Macro Avg", macro_avg));
        rows.push(aggregate_row("Weighted Avg", weighted_avg));
    }

    ReportView::Table { rows }
}

fn aggregate_row(title: &'static str, metrics: &ClassMetrics) -> ReportRow {
    ReportRow::Aggregate {
        title,
        precision: format_metric_value(metrics.precision),
        recall: format_metric_value(metrics.recall),
        f1_score: format_metric_value(metrics.f1_score),
        support: support_text(metrics.support),
    }
}

fn support_text(support: Option<u64>) -> String {
    support.map(|s| s.to_string()).unwrap_or_default()
}
