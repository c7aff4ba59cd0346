use crate::{
    AppState,
    config::ClientConfig,
    error::{
        API_KEY_NOT_CONFIGURED, AppError, INVALID_API_URL, MISSING_PROXY_FIELDS,
        SERVER_CONFIGURATION_ERROR,
    },
    http::redact::{scrub_str, upstream_details},
};
use axum::{
    Json as JsonExtractor,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

/// Body of a forwarding call. Both fields are optional here so that a missing
/// one is reported as a bad request rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ProxyRequest {
    fn into_parts(self) -> Result<(String, Value), AppError> {
        match (self.api_url, self.payload) {
            (Some(url), Some(payload)) if !url.trim().is_empty() && !is_blank(&payload) => {
                Ok((url, payload))
            }
            _ => Err(AppError::BadRequest(MISSING_PROXY_FIELDS)),
        }
    }
}

/// Falsy JSON values (`null`, `false`, `0`, `""`) count as absent.
fn is_blank(payload: &Value) -> bool {
    match payload {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Appends the secret key to the caller's URL. Only absolute http(s) URLs with
/// a host are accepted.
pub fn build_upstream_url(api_url: &str, secret: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(api_url.trim()).map_err(|_| AppError::BadRequest(INVALID_API_URL))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::BadRequest(INVALID_API_URL));
    }
    url.query_pairs_mut().append_pair("key", secret);
    Ok(url)
}

#[allow(clippy::unused_async)]
pub async fn handle_config(State(state): State<AppState>) -> Result<Json<ClientConfig>, AppError> {
    match state.config.provider.resolve() {
        Ok(config) => {
            debug!("Serving provider configuration");
            Ok(Json(config))
        }
        Err(missing) => {
            error!(
                "Provider configuration keys are missing: {}",
                missing.join(", ")
            );
            Err(AppError::Configuration(SERVER_CONFIGURATION_ERROR))
        }
    }
}

async fn send_upstream(
    state: &AppState,
    url: Url,
    payload: &Value,
    secret: &str,
) -> Result<reqwest::Response, AppError> {
    state
        .http_client
        .post(url)
        .header(header::CONTENT_TYPE, "application/json")
        .json(payload)
        .send()
        .await
        .map_err(|e| transport_error(e, secret))
}

fn transport_error(err: reqwest::Error, secret: &str) -> AppError {
    let status = err
        .status()
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = scrub_str(&err.without_url().to_string(), secret);
    AppError::Upstream {
        status,
        details: Value::String(message),
    }
}

async fn relay_upstream_response(
    response: reqwest::Response,
    secret: &str,
) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        let body = response.bytes().await.map_err(|e| transport_error(e, secret))?;
        info!("Relaying upstream response ({} bytes)", body.len());
        return Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response());
    }

    let body = response.bytes().await.unwrap_or_default();
    Err(AppError::Upstream {
        status,
        details: upstream_details(&body, secret),
    })
}

pub async fn handle_proxy(
    State(state): State<AppState>,
    body: Result<JsonExtractor<ProxyRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let secret = state
        .config
        .secret_key()
        .ok_or(AppError::Configuration(API_KEY_NOT_CONFIGURED))?;

    let JsonExtractor(request) = body.map_err(|rejection| {
        debug!("Rejected proxy body: {rejection}");
        AppError::BadRequest(MISSING_PROXY_FIELDS)
    })?;
    let (api_url, payload) = request.into_parts()?;

    let url = build_upstream_url(&api_url, secret)?;
    let host = url.host_str().unwrap_or_default().to_string();
    if !state.config.upstream_host_allowed(&host) {
        return Err(AppError::ForbiddenUpstream(host));
    }

    info!("Forwarding request to {host}{}", url.path());
    let response = send_upstream(&state, url, &payload, secret).await?;
    relay_upstream_response(response, secret).await
}
