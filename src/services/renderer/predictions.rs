use crate::models::view_types::{BadgeColor, PredictionRow, PredictionsView};
use crate::services::metric_format::format_fixed;

/// Lists the first `limit` predictions with their confidence.
pub fn prediction_table(predictions: &[String], confidence_scores: &[f64], limit: usize) -> PredictionsView {
    if predictions.len() != confidence_scores.len() {
        return PredictionsView::Misaligned {
            predictions: predictions.len(),
            confidence_scores: confidence_scores.len(),
            notice: format!(
                "Cannot list predictions: {} labels but {} confidence scores.",
                predictions.len(),
                confidence_scores.len()
            ),
        };
    }

    let shown = limit.min(predictions.len());
    let rows = predictions
        .iter()
        .zip(confidence_scores)
        .take(shown)
        .enumerate()
        .map(|(i, (label, &score))| {
            let confidence = score * 100.0;
            PredictionRow {
                index: i + 1,
                label: label.clone(),
                badge: BadgeColor::for_label(label),
                confidence,
                confidence_text: format!("{}%", format_fixed(confidence, 1)),
            }
        })
        .collect();

    let note = (predictions.len() > shown)
        .then(|| format!("Showing {} out of {} predictions.", shown, predictions.len()));

    PredictionsView::Table { rows, note }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        ["chat", "email", "voip"].iter().cycle().take(n).map(|s| s.to_string()).collect()
    }

    #[test]
    fn caps_rows_and_adds_note() {
        let view = prediction_table(&labels(25), &vec![0.5; 25], 20);
        let PredictionsView::Table { rows, note } = view else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 20);
        assert_eq!(rows.last().unwrap().index, 20);
        assert_eq!(note.as_deref(), Some("Showing 20 out of 25 predictions."));
    }

    #[test]
    fn no_note_when_everything_fits() {
        let PredictionsView::Table { rows, note } = prediction_table(&labels(20), &vec![0.9; 20], 20) else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 20);
        assert!(note.is_none());
    }

    #[test]
    fn confidence_to_one_decimal() {
        let PredictionsView::Table { rows, .. } =
            prediction_table(&labels(2), &[0.8567, 1.0], 20)
        else {
            panic!("expected a table");
        };
        assert_eq!(rows[0].confidence_text, "85.7%");
        assert_eq!(rows[0].badge, BadgeColor::Primary);
        assert_eq!(rows[1].confidence_text, "100.0%");
        assert_eq!(rows[1].badge, BadgeColor::Success);
    }

    #[test]
    fn mismatched_lengths_render_notice() {
        let view = prediction_table(&labels(3), &[0.9, 0.8], 20);
        assert!(matches!(
            view,
            PredictionsView::Misaligned {
                predictions: 3,
                confidence_scores: 2,
                ..
            }
        ));
    }

    #[test]
    fn empty_predictions() {
        assert_eq!(
            prediction_table(&[], &[], 20),
            PredictionsView::Table {
                rows: Vec::new(),
                note: None
            }
        );
    }
}
