//! Client for a network traffic classification service.
//!
//! A job validates a CSV of flow features, uploads it with progress
//! reporting, and turns the returned classification into views: a
//! distribution chart, a per-label summary, a prediction table, the
//! classification report and the confusion matrix.

pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod services;

pub use config::ClientConfig;
pub use controller::{JobStatus, UiStateController, UploadJob, ViewState};
pub use error::{AppError, FetchError, SubmitError, ValidationError};
pub use models::classify_types::ClassificationResult;
pub use models::model_types::ModelInfo;
pub use services::file_validator::{FileValidator, SelectedFile};
pub use services::model_info::ModelInfoFetcher;
pub use services::renderer::ResultRenderer;
pub use services::upload::{HttpTransport, Transport, UploadEvent, UploadOutcome, UploadTask};
