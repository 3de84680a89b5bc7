use thiserror::Error;

pub type Result<T> = std::result::Result<T, HubError>;

/// Every failure the Hub client can report.
///
/// Variants carry the identifiers (and, where useful, the set of valid
/// values) needed to correct the request without another round trip.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("{0}")]
    Authentication(String),

    #[error("{resource_type} not found: {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    #[error("model '{model_id}' is not compatible with platform '{platform_id}'")]
    ModelPlatformIncompatible {
        model_id: String,
        platform_id: String,
    },

    #[error(
        "invalid GPU count {} for model '{}' on platform '{}' (valid: {})",
        .requested,
        .model_id,
        .platform_id,
        format_counts(.valid)
    )]
    InvalidGpuCount {
        model_id: String,
        platform_id: String,
        requested: u32,
        /// Sorted ascending, deduplicated.
        valid: Vec<u32>,
    },

    #[error("invalid container type '{value}', valid types are: docker, kubernetes")]
    InvalidContainerType { value: String },

    #[error("invalid value for '{path}': expected {expected}")]
    InvalidConfigValue { path: String, expected: String },

    #[error("missing required config '{parameter}' for component '{component}'")]
    MissingRequiredConfig { component: String, parameter: String },

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },
}

impl HubError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Transport-level failure with no HTTP status attached.
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api {
            status: None,
            message: msg.into(),
            body: None,
        }
    }

    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

fn format_counts(valid: &[u32]) -> String {
    if valid.is_empty() {
        return "none".to_string();
    }
    valid
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
