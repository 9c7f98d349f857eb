use crate::services::metric_format::FormattedMetric;
use serde::Serialize;

/// Badge color class used for traffic labels and status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Primary,
    Success,
    Info,
    Warning,
    Danger,
    Secondary,
}

impl BadgeColor {
    pub fn for_label(label: &str) -> Self {
        match label {
            "chat" => BadgeColor::Primary,
            "email" => BadgeColor::Success,
            "file" => BadgeColor::Info,
            "streaming" => BadgeColor::Warning,
            "voip" => BadgeColor::Danger,
            _ => BadgeColor::Secondary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Primary => "primary",
            BadgeColor::Success => "success",
            BadgeColor::Info => "info",
            BadgeColor::Warning => "warning",
            BadgeColor::Danger => "danger",
            BadgeColor::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub summary: SummaryView,
    pub distribution: DistributionView,
    pub traffic_summary: Vec<TrafficBar>,
    pub predictions: PredictionsView,
    pub report: ReportView,
    pub confusion_matrix: ConfusionMatrixView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub num_samples: String,
    pub file_size: String,
    pub processing_time: String,
    pub device_used: String,
    pub pseudo_label_clusters: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionView {
    Chart(ChartSeries),
    /// Shown instead of a chart when the data would draw an empty or
    /// uniform donut.
    Degenerate { notice: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub total: u64,
    pub slices: Vec<ChartSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
    /// `label: count (percentage%)`
    pub tooltip: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficBar {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
    pub percentage_text: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionsView {
    Table {
        rows: Vec<PredictionRow>,
        note: Option<String>,
    },
    /// `predictions` and `confidence_scores` disagree in length.
    Misaligned {
        predictions: usize,
        confidence_scores: usize,
        notice: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    /// 1-based position in the uploaded file
    pub index: usize,
    pub label: String,
    pub badge: BadgeColor,
    /// Confidence in percent, also the bar width
    pub confidence: f64,
    pub confidence_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportView {
    Table { rows: Vec<ReportRow> },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportRow {
    Class {
        name: String,
        precision: FormattedMetric,
        recall: FormattedMetric,
        f1_score: FormattedMetric,
        support: String,
    },
    Separator,
    Accuracy {
        value: FormattedMetric,
        support: String,
    },
    Aggregate {
        title: &'static str,
        precision: FormattedMetric,
        recall: FormattedMetric,
        f1_score: FormattedMetric,
        support: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfusionMatrixView {
    Image(ConfusionMatrixImage),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrixImage {
    pub data_uri: String,
    #[serde(skip)]
    pub png: Vec<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceClass {
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "CPU")]
    Cpu,
}

impl DeviceClass {
    pub fn from_device(device: &str) -> Self {
        if device.contains("GPU") {
            DeviceClass::Gpu
        } else {
            DeviceClass::Cpu
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Gpu => "GPU",
            DeviceClass::Cpu => "CPU",
        }
    }
}

/// Status panel built from the model-info query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelInfoPanel {
    Error { message: String },
    Status(StatusCard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCard {
    pub ready: bool,
    pub readiness: &'static str,
    pub readiness_badge: BadgeColor,
    pub device_class: DeviceClass,
    pub device_badge: BadgeColor,
    pub labels: Vec<LabelBadge>,
    pub parameters: Vec<(&'static str, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelBadge {
    pub label: String,
    pub color: BadgeColor,
}
