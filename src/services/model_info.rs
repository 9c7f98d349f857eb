use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::models::model_types::ModelInfo;
use crate::models::view_types::{BadgeColor, DeviceClass, LabelBadge, ModelInfoPanel, StatusCard};
use reqwest::Url;
use tracing::{debug, warn};

/// Shown whenever the query itself fails.
pub const FETCH_FAILED_MESSAGE: &str = "Error loading model information";

#[derive(Debug, Clone)]
pub struct ModelInfoFetcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl ModelInfoFetcher {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.model_info_endpoint().clone(),
        }
    }

    /// Queries the service once. The body is read as JSON whatever the
    /// status code, since errors are reported in an `error` field.
    pub async fn fetch(&self) -> Result<ModelInfo, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let info: ModelInfo = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        if let Some(message) = info.error.clone() {
            warn!(%status, error = %message, "model service reported an error");
            return Err(FetchError::Service(message));
        }

        debug!(
            ready = info.status,
            device = %info.device,
            labels = info.labels.len(),
            "model info received"
        );
        Ok(info)
    }
}

/// Builds the status panel for a finished query.
pub fn status_panel(result: &Result<ModelInfo, FetchError>) -> ModelInfoPanel {
    let info = match result {
        Ok(info) => info,
        Err(FetchError::Service(message)) => {
            return ModelInfoPanel::Error {
                message: message.clone(),
            }
        }
        Err(_) => {
            return ModelInfoPanel::Error {
                message: FETCH_FAILED_MESSAGE.to_string(),
            }
        }
    };

    let device_class = DeviceClass::from_device(&info.device);
    let device_badge = match device_class {
        DeviceClass::Gpu => BadgeColor::Success,
        DeviceClass::Cpu => BadgeColor::Warning,
    };

    let labels = info
        .labels
        .iter()
        .map(|label| LabelBadge {
            label: label.clone(),
            color: BadgeColor::for_label(label),
        })
        .collect();

    let mut parameters = Vec::new();
    if let Some(arch) = &info.architecture {
        let counts = [
            ("Generator", arch.generator_params),
            ("Discriminator", arch.discriminator_params),
            ("Classifier", arch.classifier_params),
        ];
        parameters.extend(counts.into_iter().filter_map(|(name, count)| count.map(|c| (name, c))));
    }

    ModelInfoPanel::Status(StatusCard {
        ready: info.status,
        readiness: if info.status { "Ready" } else { "Not Loaded" },
        readiness_badge: if info.status {
            BadgeColor::Success
        } else {
            BadgeColor::Danger
        },
        device_class,
        device_badge,
        labels,
        parameters,
    })
}
