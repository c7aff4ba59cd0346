pub mod redact;
pub mod routes;

use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

pub use routes::{ProxyRequest, handle_config, handle_proxy};

pub const CONFIG_PATH: &str = "/api/config";
pub const PROXY_PATH: &str = "/api/proxy";

/// Assembles the proxy's routes. The client bundle is served as a fallback
/// when a static directory is configured.
pub fn router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new()
        .route(CONFIG_PATH, get(handle_config))
        .route(PROXY_PATH, post(handle_proxy));

    if let Some(dir) = &state.config.static_dir {
        info!("Serving static files from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}
