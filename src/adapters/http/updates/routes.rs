//! HTTP routes for update feed endpoints.

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::handlers::{get_dao_updates, get_updates_for_daos, health, UpdatesAppState};

/// Creates the updates router with all routes.
pub fn updates_routes(state: UpdatesAppState) -> Router {
    Router::new()
        // GET /api/daos/:slug/updates
        .route("/api/daos/:slug/updates", get(get_dao_updates))
        // POST /api/updates
        .route("/api/updates", post(get_updates_for_daos))
        // GET /health
        .route("/health", get(health))
        .with_state(state)
}

/// Wraps the updates router with tracing and CORS layers.
///
/// The request timeout bounds each feed build inside the handlers, so an
/// overrun still answers 200 with an empty list.
pub fn app_router(state: UpdatesAppState, server: &ServerConfig) -> Router {
    updates_routes(state.with_feed_timeout(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// Allows the configured origins, or any origin when none are configured.
/// Origins that are not valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}
