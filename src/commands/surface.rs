//! Text rendering of the view-models onto a terminal.
//!
//! All functions write to any [`Write`] so the output can be captured.

use crate::models::view_types::{
    ConfusionMatrixView, DistributionView, ModelInfoPanel, PredictionsView, ReportRow, ReportView,
    ResultsView,
};
use crate::services::metric_format::FormattedMetric;
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;

const REPORT_PLACEHOLDER: &str =
    "Classification report not available. Include a label column to evaluate the model.";
const MATRIX_PLACEHOLDER: &str =
    "Confusion matrix not available. Include a label column to evaluate the model.";

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// N/A values are bracketed so they stand apart from real percentages.
fn metric(m: &FormattedMetric) -> String {
    if m.not_applicable {
        format!("({})", m.text)
    } else {
        m.text.clone()
    }
}

pub fn write_progress<W: Write>(out: &mut W, percent: f64) -> io::Result<()> {
    write!(
        out,
        "\rUploading [{}] {:>3}%",
        bar(percent, BAR_WIDTH),
        percent.round() as u64
    )?;
    out.flush()
}

pub fn write_model_info<W: Write>(out: &mut W, panel: &ModelInfoPanel) -> io::Result<()> {
    writeln!(out, "== Model ==")?;
    match panel {
        ModelInfoPanel::Error { message } => writeln!(out, "! {}", message)?,
        ModelInfoPanel::Status(card) => {
            writeln!(out, "Model Status:      {}", card.readiness)?;
            writeln!(out, "Processing Device: {}", card.device_class.as_str())?;
            let labels: Vec<String> = card
                .labels
                .iter()
                .map(|b| format!("[{}]", b.label))
                .collect();
            writeln!(out, "Traffic Types:     {}", labels.join(" "))?;
            for (name, count) in &card.parameters {
                writeln!(out, "{} parameters: {}", name, count)?;
            }
        }
    }
    writeln!(out)
}

pub fn write_results<W: Write>(out: &mut W, view: &ResultsView) -> io::Result<()> {
    let summary = &view.summary;
    writeln!(out, "== File analysis ==")?;
    writeln!(out, "Samples:          {}", summary.num_samples)?;
    writeln!(out, "File size:        {}", summary.file_size)?;
    writeln!(out, "Processing time:  {}", summary.processing_time)?;
    writeln!(out, "Device:           {}", summary.device_used)?;
    if let Some(clusters) = summary.pseudo_label_clusters {
        writeln!(out, "Pseudo-label clusters: {}", clusters)?;
    }
    writeln!(out)?;

    writeln!(out, "== Traffic distribution ==")?;
    match &view.distribution {
        DistributionView::Chart(series) => {
            for slice in &series.slices {
                writeln!(out, "  {}", slice.tooltip)?;
            }
        }
        DistributionView::Degenerate { notice } => writeln!(out, "! {}", notice)?,
    }
    writeln!(out)?;

    writeln!(out, "== Traffic summary ==")?;
    for item in &view.traffic_summary {
        writeln!(
            out,
            "{:<12} {:>8} ({:>5}%) {}",
            item.label,
            item.count,
            item.percentage_text,
            bar(item.percentage, BAR_WIDTH)
        )?;
    }
    writeln!(out)?;

    write_predictions(out, &view.predictions)?;
    write_report(out, &view.report)?;

    writeln!(out, "== Confusion matrix ==")?;
    match &view.confusion_matrix {
        ConfusionMatrixView::Image(image) => match (image.width, image.height) {
            (Some(w), Some(h)) => writeln!(out, "PNG image, {}x{} ({} bytes)", w, h, image.png.len())?,
            _ => writeln!(out, "Image ({} bytes)", image.png.len())?,
        },
        ConfusionMatrixView::Placeholder => writeln!(out, "{}", MATRIX_PLACEHOLDER)?,
    }
    Ok(())
}

fn write_predictions<W: Write>(out: &mut W, predictions: &PredictionsView) -> io::Result<()> {
    writeln!(out, "== Predictions ==")?;
    match predictions {
        PredictionsView::Table { rows, note } => {
            writeln!(out, "{:>4}  {:<14} {:>10}  Visualization", "#", "Traffic Type", "Confidence")?;
            for row in rows {
                writeln!(
                    out,
                    "{:>4}  {:<14} {:>10}  {}",
                    row.index,
                    row.label,
                    row.confidence_text,
                    bar(row.confidence, BAR_WIDTH)
                )?;
            }
            if let Some(note) = note {
                writeln!(out, "i {}", note)?;
            }
        }
        PredictionsView::Misaligned { notice, .. } => writeln!(out, "! {}", notice)?,
    }
    writeln!(out)
}

fn write_report<W: Write>(out: &mut W, report: &ReportView) -> io::Result<()> {
    writeln!(out, "== Classification report ==")?;
    let rows = match report {
        ReportView::Table { rows } => rows,
        ReportView::Placeholder => {
            writeln!(out, "{}", REPORT_PLACEHOLDER)?;
            return writeln!(out);
        }
    };

    writeln!(
        out,
        "{:<14} {:>10} {:>10} {:>10} {:>8}",
        "Class", "Precision", "Recall", "F1-Score", "Support"
    )?;
    for row in rows {
        match row {
            ReportRow::Class {
                name,
                precision,
                recall,
                f1_score,
                support,
            } => writeln!(
                out,
                "{:<14} {:>10} {:>10} {:>10} {:>8}",
                name,
                metric(precision),
                metric(recall),
                metric(f1_score),
                support
            )?,
            ReportRow::Separator => writeln!(out, "{}", "-".repeat(56))?,
            ReportRow::Accuracy { value, support } => writeln!(
                out,
                "{:<14} {:>32} {:>8}",
                "Accuracy",
                metric(value),
                support
            )?,
            ReportRow::Aggregate {
                title,
                precision,
                recall,
                f1_score,
                support,
            } => writeln!(
                out,
                "{:<14} {:>10} {:>10} {:>10} {:>8}",
                title,
                metric(precision),
                metric(recall),
                metric(f1_score),
                support
            )?,
        }
    }
    writeln!(out)
}
