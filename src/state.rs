use crate::config::ServerConfig;
use reqwest::Client;
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub http_client: Client,
}

impl AppState {
    /// Builds the shared outbound client. Only the idle pool timeout is set;
    /// request timeouts stay at the client defaults.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(config.idle_connection_timeout))
            .build()?;
        Ok(Self::with_client(config, http_client))
    }

    #[must_use]
    pub fn with_client(config: ServerConfig, http_client: Client) -> Self {
        Self {
            config: Arc::new(config),
            http_client,
        }
    }
}
