use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IDLE_CONNECTION_TIMEOUT: u64 = 60;

/// Database-provider identifiers as read from the environment. Any field may be
/// missing; [`ProviderConfig::resolve`] decides whether the set is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

/// Fully populated provider configuration handed to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    pub measurement_id: String,
}

impl ProviderConfig {
    fn fields(&self) -> [(&'static str, Option<&String>); 7] {
        [
            ("FB_API_KEY", self.api_key.as_ref()),
            ("FB_AUTH_DOMAIN", self.auth_domain.as_ref()),
            ("FB_PROJECT_ID", self.project_id.as_ref()),
            ("FB_STORAGE_BUCKET", self.storage_bucket.as_ref()),
            ("FB_MESSAGING_SENDER_ID", self.messaging_sender_id.as_ref()),
            ("FB_APP_ID", self.app_id.as_ref()),
            ("FB_MEASUREMENT_ID", self.measurement_id.as_ref()),
        ]
    }

    /// Names of the environment keys that are unset or empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.is_none_or(|v| v.is_empty()))
            .map(|(name, _)| name)
            .collect()
    }

    /// Returns the complete client configuration, or the list of missing keys.
    /// A partial configuration is never produced.
    pub fn resolve(&self) -> Result<ClientConfig, Vec<&'static str>> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }
        let take = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(ClientConfig {
            api_key: take(&self.api_key),
            auth_domain: take(&self.auth_domain),
            project_id: take(&self.project_id),
            storage_bucket: take(&self.storage_bucket),
            messaging_sender_id: take(&self.messaging_sender_id),
            app_id: take(&self.app_id),
            measurement_id: take(&self.measurement_id),
        })
    }
}

impl From<ClientConfig> for ProviderConfig {
    fn from(config: ClientConfig) -> Self {
        Self {
            api_key: Some(config.api_key),
            auth_domain: Some(config.auth_domain),
            project_id: Some(config.project_id),
            storage_bucket: Some(config.storage_bucket),
            messaging_sender_id: Some(config.messaging_sender_id),
            app_id: Some(config.app_id),
            measurement_id: Some(config.measurement_id),
        }
    }
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Default)]
pub struct ServerConfig {
    pub provider: ProviderConfig,
    pub gemini_api_key: Option<SecretString>,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub allowed_upstream_hosts: Vec<String>,
    pub idle_connection_timeout: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values are
    /// treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = ProviderConfig {
            api_key: get("FB_API_KEY"),
            auth_domain: get("FB_AUTH_DOMAIN"),
            project_id: get("FB_PROJECT_ID"),
            storage_bucket: get("FB_STORAGE_BUCKET"),
            messaging_sender_id: get("FB_MESSAGING_SENDER_ID"),
            app_id: get("FB_APP_ID"),
            measurement_id: get("FB_MEASUREMENT_ID"),
        };

        let allowed_upstream_hosts = get("UPSTREAM_ALLOWED_HOSTS")
            .map(|hosts| {
                hosts
                    .split(',')
                    .map(|h| h.trim().to_ascii_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            provider,
            gemini_api_key: get("GEMINI_API_KEY").map(SecretString::from),
            port: get("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            allowed_upstream_hosts,
            idle_connection_timeout: get("IDLE_CONNECTION_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_IDLE_CONNECTION_TIMEOUT),
        }
    }

    /// The generative-AI key, if one is configured.
    #[must_use]
    pub fn secret_key(&self) -> Option<&str> {
        self.gemini_api_key.as_ref().map(|key| key.expose_secret())
    }

    /// An empty allowlist permits every host.
    #[must_use]
    pub fn upstream_host_allowed(&self, host: &str) -> bool {
        self.allowed_upstream_hosts.is_empty()
            || self
                .allowed_upstream_hosts
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}
