use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct AppError {
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError {
            message: format!("Invalid base64 payload: {}", err),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError { message: msg }
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError {
            message: msg.to_string(),
        }
    }
}

/// Reasons a candidate file is rejected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing was selected
    Missing,
    /// File exceeds the upload limit
    TooLarge { size: u64, limit: u64 },
    /// Filename does not end in `.csv`
    UnsupportedType { name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Please select a file"),
            Self::TooLarge { limit, .. } => {
                write!(f, "File is too large (max {}MB)", limit / (1024 * 1024))
            }
            Self::UnsupportedType { .. } => write!(f, "Only CSV files are allowed"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Why a submission never reached the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Invalid(ValidationError),
    /// A job is already loading or its results are still displayed
    JobInFlight,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{}", err),
            Self::JobInFlight => write!(f, "An upload is already in progress"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Invalid(err)
    }
}

/// Failures of the model-info query. Never fatal to the upload flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not complete
    Network(String),
    /// The body was not the expected JSON
    Decode(String),
    /// The service answered with an `error` field
    Service(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Model info request failed: {}", msg),
            Self::Decode(msg) => write!(f, "Model info response was invalid: {}", msg),
            Self::Service(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_alerts() {
        assert_eq!(ValidationError::Missing.to_string(), "Please select a file");
        assert_eq!(
            ValidationError::TooLarge {
                size: 300 * 1024 * 1024,
                limit: 209_715_200
            }
            .to_string(),
            "File is too large (max 200MB)"
        );
        assert_eq!(
            ValidationError::UnsupportedType {
                name: "flows.txt".into()
            }
            .to_string(),
            "Only CSV files are allowed"
        );
    }

    #[test]
    fn submit_error_wraps_validation() {
        let err: SubmitError = ValidationError::Missing.into();
        assert_eq!(err, SubmitError::Invalid(ValidationError::Missing));
        assert_eq!(err.to_string(), "Please select a file");
    }

    #[test]
    fn app_error_from_str() {
        let err: AppError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
