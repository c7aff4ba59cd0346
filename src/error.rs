use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};

pub const SERVER_CONFIGURATION_ERROR: &str = "Server configuration error.";
pub const API_KEY_NOT_CONFIGURED: &str = "API key not configured on server.";
pub const MISSING_PROXY_FIELDS: &str = "Missing apiUrl or payload";
pub const INVALID_API_URL: &str = "Invalid apiUrl";
pub const UPSTREAM_HOST_NOT_ALLOWED: &str = "Upstream host not allowed";
pub const UPSTREAM_FAILURE: &str = "Failed to fetch from upstream API";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(&'static str),
    #[error("Bad request: {0}")]
    BadRequest(&'static str),
    #[error("Upstream host not allowed: {0}")]
    ForbiddenUpstream(String),
    #[error("Upstream error: {status}")]
    Upstream { status: StatusCode, details: Value },
}

impl AppError {
    /// Status code the error is rendered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ForbiddenUpstream(_) => StatusCode::FORBIDDEN,
            AppError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Configuration(message) => {
                error!("Configuration Error: {message}");
                json!({ "error": message })
            }
            AppError::BadRequest(message) => {
                warn!("Bad Request: {message}");
                json!({ "error": message })
            }
            AppError::ForbiddenUpstream(host) => {
                warn!("Rejected upstream host: {host}");
                json!({ "error": UPSTREAM_HOST_NOT_ALLOWED })
            }
            AppError::Upstream { status, details } => {
                error!("Upstream Error: {status} - {details}");
                json!({ "error": UPSTREAM_FAILURE, "details": details })
            }
        };

        (status, Json(body)).into_response()
    }
}
