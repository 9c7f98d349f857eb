use crate::commands::surface;
use crate::config::ClientConfig;
use crate::controller::{UiStateController, ViewState};
use crate::error::{AppError, FetchError};
use crate::models::model_types::ModelInfo;
use crate::models::view_types::{ConfusionMatrixView, ModelInfoPanel, ResultsView};
use crate::services::file_validator::SelectedFile;
use crate::services::model_info::{status_panel, ModelInfoFetcher, FETCH_FAILED_MESSAGE};
use crate::services::upload::{HttpTransport, UploadEvent};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub file: PathBuf,
    pub json: bool,
    pub save_confusion_matrix: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    model: &'a ModelInfoPanel,
    results: Option<&'a ResultsView>,
}

/// Runs one classification job against stdout and stderr. Returns `false`
/// when the job ended in an alert instead of results.
pub async fn run_classify(config: ClientConfig, options: ClassifyOptions) -> Result<bool, AppError> {
    run_classify_with(config, options, &mut std::io::stdout(), &mut std::io::stderr()).await
}

/// Same as [`run_classify`] with explicit output streams. The model panel is
/// written whatever happens to the upload; progress and alerts go to `err`.
pub async fn run_classify_with<O: Write, E: Write>(
    config: ClientConfig,
    options: ClassifyOptions,
    out: &mut O,
    err: &mut E,
) -> Result<bool, AppError> {
    // Model info is independent of the upload; query it alongside
    let fetcher = ModelInfoFetcher::new(&config);
    let model_info = tokio::spawn(async move { fetcher.fetch().await });

    let mut controller = UiStateController::new(HttpTransport::new(&config), &config);

    let started = match SelectedFile::from_path(&options.file) {
        Ok(file) => controller
            .drop_file(file)
            .map_err(|e| controller.take_alert().unwrap_or_else(|| e.to_string())),
        Err(e) => Err(e.message),
    };

    let alert = match started {
        Ok(mut task) => {
            let mut showed_progress = false;
            while let Some(event) = task.next_event().await {
                if let UploadEvent::Progress(percent) = &event {
                    surface::write_progress(err, *percent)?;
                    showed_progress = true;
                }
                controller.apply(event);
            }
            if showed_progress {
                writeln!(err)?;
            }
            controller.take_alert()
        }
        Err(alert) => Some(alert),
    };

    let panel = model_panel(model_info).await;
    let results = match controller.state() {
        ViewState::Results => controller.results(),
        _ => None,
    };

    if options.json {
        let output = JsonOutput {
            model: &panel,
            results,
        };
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        surface::write_model_info(out, &panel)?;
        if let Some(results) = results {
            surface::write_results(out, results)?;
        }
    }
    out.flush()?;

    let Some(results) = results else {
        if let Some(alert) = alert {
            writeln!(err, "{}", alert)?;
        }
        return Ok(false);
    };

    if let Some(path) = &options.save_confusion_matrix {
        match &results.confusion_matrix {
            ConfusionMatrixView::Image(image) => {
                tokio::fs::write(path, &image.png).await.map_err(|e| AppError {
                    message: format!("Failed to write {}: {}", path.display(), e),
                })?;
                info!(path = %path.display(), "saved confusion matrix");
            }
            ConfusionMatrixView::Placeholder => {
                warn!("no confusion matrix in the results, nothing saved")
            }
        }
    }

    controller.back();
    Ok(true)
}

async fn model_panel(handle: JoinHandle<Result<ModelInfo, FetchError>>) -> ModelInfoPanel {
    match handle.await {
        Ok(result) => status_panel(&result),
        Err(e) => {
            warn!(error = %e, "model info task failed");
            ModelInfoPanel::Error {
                message: FETCH_FAILED_MESSAGE.to_string(),
            }
        }
    }
}
