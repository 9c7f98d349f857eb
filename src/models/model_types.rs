use serde::{Deserialize, Serialize};

/// Readiness and metadata reported by `GET /model-info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub architecture: Option<Architecture>,
}

/// Parameter counts of the networks behind the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub generator_params: Option<u64>,
    #[serde(default)]
    pub discriminator_params: Option<u64>,
    #[serde(default)]
    pub classifier_params: Option<u64>,
}
