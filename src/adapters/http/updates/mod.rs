//! Updates HTTP adapter module.
//!
//! Provides REST API endpoints for DAO update feeds.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse, UpdatesRequest};
pub use handlers::{UpdatesApiError, UpdatesAppState};
pub use routes::{app_router, updates_routes};
