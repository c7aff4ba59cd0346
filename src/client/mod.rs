//! Caller-side wrapper around the proxy's two endpoints.
//!
//! Nothing here ever holds the generative-AI key: calls name the upstream URL
//! and the proxy adds the credential on its side.

mod error;

pub use error::ClientError;

use crate::{
    config::ClientConfig,
    http::{CONFIG_PATH, PROXY_PATH, ProxyRequest},
};
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: Url,
    http_client: Client,
}

impl ProxyClient {
    /// Creates a client for the proxy rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http_client: Client) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http_client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Retrieves the provider configuration the proxy holds.
    pub async fn fetch_client_config(&self) -> Result<ClientConfig, ClientError> {
        let response = self.http_client.get(self.endpoint(CONFIG_PATH)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("Provider config request failed with {status}");
            return Err(ClientError::ConfigurationFetch { status });
        }
        Ok(response.json().await?)
    }

    /// Sends `payload` to `api_url` through the proxy and returns the upstream
    /// response body.
    pub async fn call_upstream<P>(&self, api_url: &str, payload: &P) -> Result<Value, ClientError>
    where
        P: Serialize + ?Sized,
    {
        self.call_upstream_as(api_url, payload).await
    }

    /// Like [`ProxyClient::call_upstream`], deserializing into `T`.
    pub async fn call_upstream_as<T, P>(&self, api_url: &str, payload: &P) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = ProxyRequest {
            api_url: Some(api_url.to_string()),
            payload: Some(serde_json::to_value(payload)?),
        };
        debug!("Calling upstream {api_url} via proxy");
        let response = self
            .http_client
            .post(self.endpoint(PROXY_PATH)?)
            .json(&body)
            .send()
            .await?;
        let response = check_proxy_response(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_proxy_response(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let envelope: Option<Value> = response.json().await.ok();
    let message = envelope
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(
            || status.canonical_reason().unwrap_or("unknown error").to_string(),
            ToString::to_string,
        );
    error!("Error from proxy server: {status} {message}");
    Err(ClientError::UpstreamCall { status, message })
}
