//! The single upload request of a classification job.
//!
//! [`Transport::start`] returns an [`UploadTask`]: a stream of
//! [`UploadEvent::Progress`] values, non-decreasing, followed by exactly one
//! [`UploadEvent::Finished`]. Nothing is delivered after the terminal event.

use crate::config::ClientConfig;
use crate::models::classify_types::{ClassificationResult, UploadResponse};
use crate::services::file_validator::SelectedFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode, Url};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Multipart field the service reads the file from.
pub const FILE_FIELD: &str = "file";

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success(Box<ClassificationResult>),
    /// 200 response whose payload reports a failure
    ApplicationError(String),
    /// Any status other than 200
    ServerError(u16),
    /// The request could not complete
    NetworkError(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    /// Notice shown to the user for failed uploads.
    pub fn alert(&self) -> Option<String> {
        match self {
            UploadOutcome::Success(_) => None,
            UploadOutcome::ApplicationError(msg) => Some(format!("Error: {}", msg)),
            UploadOutcome::ServerError(code) => {
                Some(format!("Error processing file. Status code: {}", code))
            }
            UploadOutcome::NetworkError(_) => Some("Network error occurred".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// Percentage of the file's bytes handed to the request body stream.
    /// Multipart framing is not counted; 100 is confirmed once the response arrives.
    Progress(f64),
    Finished(UploadOutcome),
}

#[derive(Debug, Default)]
struct ChannelState {
    last_percent: Option<f64>,
    finished: bool,
}

/// Cloneable progress handle. Drops values that would move backwards and
/// anything reported after the upload finished.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<UploadEvent>,
    state: Arc<Mutex<ChannelState>>,
}

impl ProgressSender {
    pub fn report(&self, percent: f64) {
        if !percent.is_finite() {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        let mut state = self.lock();
        if state.finished || state.last_percent.is_some_and(|last| percent <= last) {
            return;
        }
        state.last_percent = Some(percent);
        let _ = self.tx.send(UploadEvent::Progress(percent));
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Producer side of an [`UploadTask`]. Finishing consumes it, so only one
/// terminal event can ever be sent.
#[derive(Debug)]
pub struct UploadSender {
    progress: ProgressSender,
}

impl UploadSender {
    pub fn progress(&self) -> ProgressSender {
        self.progress.clone()
    }

    pub fn report(&self, percent: f64) {
        self.progress.report(percent);
    }

    pub fn finish(self, outcome: UploadOutcome) {
        let mut state = self.progress.lock();
        state.finished = true;
        let _ = self.progress.tx.send(UploadEvent::Finished(outcome));
    }
}

/// Consumer side of one upload.
#[derive(Debug)]
pub struct UploadTask {
    rx: mpsc::UnboundedReceiver<UploadEvent>,
    done: bool,
}

impl UploadTask {
    pub fn channel() -> (UploadSender, UploadTask) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = UploadSender {
            progress: ProgressSender {
                tx,
                state: Arc::new(Mutex::new(ChannelState::default())),
            },
        };
        (sender, UploadTask { rx, done: false })
    }

    /// Next event in delivery order; `None` once the terminal event has been
    /// returned. A producer that vanishes without finishing is reported as a
    /// network error.
    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        if self.done {
            return None;
        }
        match self.rx.recv().await {
            Some(UploadEvent::Finished(outcome)) => {
                self.done = true;
                Some(UploadEvent::Finished(outcome))
            }
            Some(progress) => Some(progress),
            None => {
                self.done = true;
                Some(UploadEvent::Finished(UploadOutcome::NetworkError(
                    "upload ended without a response".to_string(),
                )))
            }
        }
    }

    /// Drains the task and returns its terminal outcome.
    pub async fn outcome(mut self) -> UploadOutcome {
        while let Some(event) = self.next_event().await {
            if let UploadEvent::Finished(outcome) = event {
                return outcome;
            }
        }
        UploadOutcome::NetworkError("upload ended without a response".to_string())
    }
}

/// Starts uploads. The controller only talks to this trait.
pub trait Transport {
    /// Begins uploading `file`. Must be called from within a tokio runtime.
    fn start(&self, file: &SelectedFile) -> UploadTask;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.upload_endpoint().clone(),
        }
    }
}

impl Transport for HttpTransport {
    fn start(&self, file: &SelectedFile) -> UploadTask {
        let (sender, task) = UploadTask::channel();
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let file = file.clone();

        tokio::spawn(async move {
            let outcome = send_file(&client, endpoint, &file, &sender).await;
            match &outcome {
                UploadOutcome::Success(result) => info!(
                    file = %file.name,
                    samples = result.num_samples,
                    "classification finished"
                ),
                other => warn!(file = %file.name, outcome = ?other, "upload failed"),
            }
            sender.finish(outcome);
        });

        task
    }
}

async fn send_file(
    client: &reqwest::Client,
    endpoint: Url,
    file: &SelectedFile,
    sender: &UploadSender,
) -> UploadOutcome {
    let handle = match tokio::fs::File::open(&file.path).await {
        Ok(handle) => handle,
        Err(e) => {
            return UploadOutcome::NetworkError(format!(
                "Failed to open {}: {}",
                file.path.display(),
                e
            ))
        }
    };

    let total = file.size;
    let progress = sender.progress();

    // Progress advances as chunks are read into the body stream, measured against the file size

    let chunks = futures::stream::try_unfold((handle, 0u64), move |(mut handle, loaded)| {
        let progress = progress.clone();
        async move {
            let mut buf = vec![0u8; CHUNK_SIZE];
            let read = handle.read(&mut buf).await?;
            if read == 0 {
                return Ok::<_, std::io::Error>(None);
            }
            buf.truncate(read);
            let loaded = loaded + read as u64;
            if total > 0 {
                progress.report(loaded as f64 / total as f64 * 100.0);
            }
            Ok(Some((buf, (handle, loaded))))
        }
    });

    let part = match Part::stream_with_length(Body::wrap_stream(chunks), total)
        .file_name(file.name.clone())
        .mime_str("text/csv")
    {
        Ok(part) => part,
        Err(e) => return UploadOutcome::NetworkError(e.to_string()),
    };
    let form = Form::new().part(FILE_FIELD, part);

    debug!(endpoint = %endpoint, file = %file.name, bytes = total, "sending upload");

    let response = match client.post(endpoint).multipart(form).send().await {
        Ok(response) => response,
        Err(e) => return UploadOutcome::NetworkError(e.to_string()),
    };

    // The request completed, so the whole body went out
    if total > 0 {
        sender.report(100.0);
    }

    let status = response.status();
    if status != StatusCode::OK {
        return UploadOutcome::ServerError(status.as_u16());
    }

    match response.text().await {
        Ok(body) => parse_upload_response(&body),
        Err(e) => UploadOutcome::NetworkError(e.to_string()),
    }
}

/// Interprets the body of a 200 response.
pub fn parse_upload_response(body: &str) -> UploadOutcome {
    let response: UploadResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            return UploadOutcome::ApplicationError(format!("Invalid response from server: {}", e))
        }
    };

    match (response.success, response.results) {
        (true, Some(results)) => UploadOutcome::Success(Box::new(results)),
        (true, None) => UploadOutcome::ApplicationError("Response contained no results".to_string()),
        (false, _) => UploadOutcome::ApplicationError(
            response.error.unwrap_or_else(|| "Unknown error".to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT_JSON: &str = r#"{
        "num_samples": 1, "file_size_mb": 0.001, "processing_time": 0.2,
        "device_used": "/CPU:0", "distribution": {"chat": 1},
        "predictions": ["chat"], "confidence_scores": [0.97]
    }"#;

    #[test]
    fn parses_success_envelope() {
        let body = format!(r#"{{"success": true, "results": {}}}"#, RESULT_JSON);
        match parse_upload_response(&body) {
            UploadOutcome::Success(result) => {
                assert_eq!(result.num_samples, 1);
                assert_eq!(result.predictions, vec!["chat".to_string()]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn application_error_uses_payload_message() {
        let outcome = parse_upload_response(r#"{"success": false, "error": "Models not loaded properly"}"#);
        assert_eq!(
            outcome,
            UploadOutcome::ApplicationError("Models not loaded properly".into())
        );
        assert_eq!(
            outcome.alert().as_deref(),
            Some("Error: Models not loaded properly")
        );
    }

    #[test]
    fn unparsable_body_is_application_error() {
        assert!(matches!(
            parse_upload_response("<html>oops</html>"),
            UploadOutcome::ApplicationError(_)
        ));
        assert!(matches!(
            parse_upload_response(r#"{"success": true}"#),
            UploadOutcome::ApplicationError(_)
        ));
    }

    #[test]
    fn alerts_for_each_failure() {
        assert_eq!(
            UploadOutcome::ServerError(413).alert().as_deref(),
            Some("Error processing file. Status code: 413")
        );
        assert_eq!(
            UploadOutcome::NetworkError("refused".into()).alert().as_deref(),
            Some("Network error occurred")
        );
    }

    #[tokio::test]
    async fn progress_never_decreases_and_stops_after_finish() {
        let (sender, mut task) = UploadTask::channel();
        let progress = sender.progress();
        progress.report(10.0);
        progress.report(5.0);
        progress.report(f64::NAN);
        progress.report(10.0);
        sender.report(150.0);
        sender.finish(UploadOutcome::ServerError(500));
        progress.report(100.0);

        let mut events = Vec::new();
        while let Some(event) = task.next_event().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                UploadEvent::Progress(10.0),
                UploadEvent::Progress(100.0),
                UploadEvent::Finished(UploadOutcome::ServerError(500)),
            ]
        );
    }

    #[tokio::test]
    async fn vanished_producer_reports_network_error() {
        let (sender, task) = UploadTask::channel();
        sender.report(42.0);
        drop(sender);
        assert!(matches!(task.outcome().await, UploadOutcome::NetworkError(_)));
    }
}
