//! Client configuration: where the classification service lives and the
//! limits applied before anything is sent to it.
//!
//! The base URL is resolved in this order:
//! 1. `--url` on the command line
//! 2. `$TRAFFIC_LENS_URL`
//! 3. [`DEFAULT_BASE_URL`]

use crate::error::AppError;
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the service base URL
pub const BASE_URL_ENV: &str = "TRAFFIC_LENS_URL";

/// 200 MiB, the largest file the service accepts.
pub const MAX_UPLOAD_BYTES: u64 = 209_715_200;

/// Number of individual predictions listed in the results table.
pub const PREDICTION_DISPLAY_LIMIT: usize = 20;

const MODEL_INFO_PATH: &str = "model-info";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub max_upload_bytes: u64,
    pub prediction_display_limit: usize,
    upload_endpoint: Url,
    model_info_endpoint: Url,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|e| AppError {
            message: format!("Invalid service URL '{}': {}", base_url, e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(format!("Service URL '{}' cannot be used as a base", base_url).into());
        }

        // Joining relative paths replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let model_info_endpoint = base_url.join(MODEL_INFO_PATH).map_err(|e| AppError {
            message: format!("Failed to build model info URL: {}", e),
        })?;

        Ok(Self {
            upload_endpoint: base_url.clone(),
            model_info_endpoint,
            base_url,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            prediction_display_limit: PREDICTION_DISPLAY_LIMIT,
        })
    }

    /// Builds the configuration from an optional command-line URL, falling
    /// back to the environment and then the default.
    pub fn resolve(cli_url: Option<&str>) -> Result<Self, AppError> {
        let env_url = std::env::var(BASE_URL_ENV).ok();
        Self::new(&resolve_base_url(cli_url, env_url))
    }

    pub fn upload_endpoint(&self) -> &Url {
        &self.upload_endpoint
    }

    pub fn model_info_endpoint(&self) -> &Url {
        &self.model_info_endpoint
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid");
        let model_info_endpoint = base_url
            .join(MODEL_INFO_PATH)
            .expect("default model info URL is valid");
        Self {
            upload_endpoint: base_url.clone(),
            model_info_endpoint,
            base_url,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            prediction_display_limit: PREDICTION_DISPLAY_LIMIT,
        }
    }
}

fn resolve_base_url(cli_url: Option<&str>, env_url: Option<String>) -> String {
    if let Some(url) = cli_url.filter(|u| !u.trim().is_empty()) {
        return url.to_string();
    }
    if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
        return url;
    }
    DEFAULT_BASE_URL.to_string()
}
