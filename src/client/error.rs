use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The proxy could not hand out the provider configuration. Callers treat
    /// this as fatal to startup.
    #[error("Could not fetch provider config from server ({status})")]
    ConfigurationFetch { status: StatusCode },

    /// The proxy answered a forwarding call with an error envelope.
    #[error("Proxy error: {message}")]
    UpstreamCall { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid proxy base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ConfigurationFetch { status } | Self::UpstreamCall { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            Self::Serialization(_) | Self::InvalidUrl(_) => None,
        }
    }
}
