//! HTTP handlers for update feed endpoints.
//!
//! These handlers connect Axum routes to the feed query handler.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{GetDaoUpdatesHandler, GetDaoUpdatesQuery, GetDaoUpdatesResult};

use super::dto::{DaoUpdate, ErrorResponse, HealthResponse, UpdatesRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Updates API error that implements IntoResponse.
#[derive(Debug)]
pub enum UpdatesApiError {
    BadRequest(String),
}

impl IntoResponse for UpdatesApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            UpdatesApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing the feed handler.
#[derive(Clone)]
pub struct UpdatesAppState {
    pub feed_handler: Arc<GetDaoUpdatesHandler>,
    /// Upper bound on one feed build; `None` waits for the build to finish.
    pub feed_timeout: Option<Duration>,
}

impl UpdatesAppState {
    pub fn new(feed_handler: GetDaoUpdatesHandler) -> Self {
        Self {
            feed_handler: Arc::new(feed_handler),
            feed_timeout: None,
        }
    }

    pub fn with_feed_timeout(mut self, timeout: Duration) -> Self {
        self.feed_timeout = Some(timeout);
        self
    }

    /// Runs a feed build under the configured deadline. An expired build is
    /// dropped and yields an empty feed.
    async fn bounded<F>(&self, build: F) -> GetDaoUpdatesResult
    where
        F: Future<Output = GetDaoUpdatesResult>,
    {
        let Some(limit) = self.feed_timeout else {
            return build.await;
        };

        match tokio::time::timeout(limit, build).await {
            Ok(updates) => updates,
            Err(_) => {
                tracing::error!(timeout_secs = limit.as_secs_f64(), "feed build timed out");
                Vec::new()
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/daos/:slug/updates
pub async fn get_dao_updates(
    State(state): State<UpdatesAppState>,
    Path(slug): Path<String>,
) -> Json<Vec<DaoUpdate>> {
    let updates = state
        .bounded(state.feed_handler.handle(GetDaoUpdatesQuery::new(slug)))
        .await;
    Json(updates)
}

/// POST /api/updates
pub async fn get_updates_for_daos(
    State(state): State<UpdatesAppState>,
    Json(request): Json<UpdatesRequest>,
) -> Result<Json<Vec<DaoUpdate>>, UpdatesApiError> {
    if request.dao_slugs.is_empty() {
        return Err(UpdatesApiError::BadRequest(
            "dao_slugs must contain at least one slug".to_string(),
        ));
    }
    if request.dao_slugs.iter().any(|slug| slug.trim().is_empty()) {
        return Err(UpdatesApiError::BadRequest(
            "dao_slugs must not contain blank slugs".to_string(),
        ));
    }

    let updates = state
        .bounded(
            state
                .feed_handler
                .handle_many(&request.dao_slugs, request.user_holdings),
        )
        .await;
    Ok(Json(updates))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
