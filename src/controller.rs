//! Visibility state of the classification flow.
//!
//! Exactly one of [`ViewState::Upload`], [`ViewState::Loading`] and
//! [`ViewState::Results`] is active. Submissions are only accepted from
//! `Upload`, so a second upload can never start while one is in flight.

use crate::config::ClientConfig;
use crate::error::SubmitError;
use crate::models::view_types::ResultsView;
use crate::services::file_validator::{FileValidator, SelectedFile};
use crate::services::renderer::ResultRenderer;
use crate::services::upload::{Transport, UploadEvent, UploadOutcome, UploadTask};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewState {
    Upload,
    Loading,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Idle,
    Uploading,
    /// Body fully sent, waiting for the service
    Processing,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadJob {
    pub file: SelectedFile,
    pub status: JobStatus,
}

pub struct UiStateController<T> {
    transport: T,
    validator: FileValidator,
    renderer: ResultRenderer,
    state: ViewState,
    file_input: Option<SelectedFile>,
    job: Option<UploadJob>,
    progress: f64,
    results: Option<ResultsView>,
    alert: Option<String>,
}

impl<T: Transport> UiStateController<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            validator: FileValidator::new(config.max_upload_bytes),
            renderer: ResultRenderer::new(config.prediction_display_limit),
            state: ViewState::Upload,
            file_input: None,
            job: None,
            progress: 0.0,
            results: None,
            alert: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Upload progress indicator, 0 to 100.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn job(&self) -> Option<&UploadJob> {
        self.job.as_ref()
    }

    pub fn file_input(&self) -> Option<&SelectedFile> {
        self.file_input.as_ref()
    }

    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn renderer(&self) -> &ResultRenderer {
        &self.renderer
    }

    /// Pending user-visible notice, cleared once taken.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Puts a file in the input. Ignored outside `Upload`, where the input
    /// is not shown.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        if self.state != ViewState::Upload {
            warn!(state = ?self.state, "file selection ignored while a job is active");
            return;
        }
        self.job = None;
        self.file_input = file;
    }

    /// Select and submit in one step, as when a file is dropped.
    pub fn drop_file(&mut self, file: SelectedFile) -> Result<UploadTask, SubmitError> {
        if self.state != ViewState::Upload {
            return Err(SubmitError::JobInFlight);
        }
        self.select_file(Some(file));
        self.submit()
    }

    /// Validates the selected file and starts the upload.
    pub fn submit(&mut self) -> Result<UploadTask, SubmitError> {
        if self.state != ViewState::Upload {
            warn!(state = ?self.state, "submission rejected, a job is already active");
            return Err(SubmitError::JobInFlight);
        }

        let file = match self.validator.validate(self.file_input.as_ref()) {
            Ok(file) => file.clone(),
            Err(e) => {
                info!(reason = %e, "file rejected");
                self.alert = Some(e.to_string());
                return Err(e.into());
            }
        };

        info!(file = %file.name, bytes = file.size, "starting upload");
        self.state = ViewState::Loading;
        self.progress = 0.0;
        let task = self.transport.start(&file);
        self.job = Some(UploadJob {
            file,
            status: JobStatus::Uploading,
        });
        Ok(task)
    }

    /// Applies one event from the running upload.
    pub fn apply(&mut self, event: UploadEvent) {
        if self.state != ViewState::Loading {
            warn!(state = ?self.state, event = ?event, "upload event outside of loading");
            return;
        }

        match event {
            UploadEvent::Progress(percent) => {
                self.progress = self.progress.max(percent);
                if self.progress >= 100.0 {
                    self.set_job_status(JobStatus::Processing);
                }
            }
            UploadEvent::Finished(outcome) => self.finish(outcome),
        }
    }

    /// Feeds every event of `task` through [`apply`](Self::apply) and
    /// returns the resulting state.
    pub async fn drive(&mut self, mut task: UploadTask) -> ViewState {
        while let Some(event) = task.next_event().await {
            self.apply(event);
        }
        self.state
    }

    fn finish(&mut self, outcome: UploadOutcome) {
        match outcome {
            UploadOutcome::Success(result) => {
                self.set_job_status(JobStatus::Done);
                self.results = Some(self.renderer.render(&result));
                self.state = ViewState::Results;
                debug!("showing results");
            }
            failure => {
                self.set_job_status(JobStatus::Error);
                self.alert = failure.alert();
                self.reset();
            }
        }
    }

    /// Returns to the upload form, discarding everything rendered.
    pub fn back(&mut self) {
        if self.state == ViewState::Loading {
            warn!("back ignored while an upload is running");
            return;
        }
        self.job = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.renderer.dispose();
        self.results = None;
        self.progress = 0.0;
        self.file_input = None;
        self.state = ViewState::Upload;
    }

    fn set_job_status(&mut self, status: JobStatus) {
        if let Some(job) = self.job.as_mut() {
            job.status = status;
        }
    }
}
