use anyhow::Result;
use nurture_proxy::{AppState, config::ServerConfig, http, logging};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = ServerConfig::from_env();
    let missing = config.provider.missing_fields();
    if !missing.is_empty() {
        warn!("Provider configuration incomplete, missing: {}", missing.join(", "));
    }
    if config.secret_key().is_none() {
        warn!("GEMINI_API_KEY is not set; proxy calls will be rejected");
    }
    if config.allowed_upstream_hosts.is_empty() {
        warn!("UPSTREAM_ALLOWED_HOSTS is not set; forwarding to any host");
    }

    let listen_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;
    let app = http::router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    info!("Server running on port {}", listen_addr.port());

    axum::serve(listener, app).await?;

    Ok(())
}
