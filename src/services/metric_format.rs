//! Conversion of raw metric values into display strings.
//!
//! Every metric shown to the user goes through [`format_metric_value`] or
//! [`format_percent`]. Both follow the same rule: a missing or non-finite
//! value is "not applicable" and is shown as [`NOT_APPLICABLE`], never as
//! `0.00%`, so it cannot be mistaken for a real zero score.

use serde::Serialize;
use std::fmt;

pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMetric {
    pub text: String,
    /// Set when `text` is the N/A sentinel; surfaces style it differently.
    pub not_applicable: bool,
}

impl FormattedMetric {
    fn not_applicable() -> Self {
        Self {
            text: NOT_APPLICABLE.to_string(),
            not_applicable: true,
        }
    }
}

impl fmt::Display for FormattedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// `0.8567` → `"85.67%"`.
pub fn format_metric_value(value: Option<f64>) -> FormattedMetric {
    match value {
        Some(v) if v.is_finite() => FormattedMetric {
            text: format!("{:.2}%", v * 100.0),
            not_applicable: false,
        },
        _ => FormattedMetric::not_applicable(),
    }
}

/// Plain-text form of [`format_metric_value`].
pub fn format_percent(value: Option<f64>) -> String {
    format_metric_value(value).text
}

/// Share of `part` in `whole` as a percentage; 0 when `whole` is not positive.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && whole.is_finite() {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// `1234567` → `"1,234,567"`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
