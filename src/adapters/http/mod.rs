//! HTTP adapters - REST API implementations.

pub mod updates;

// Re-export key types for convenience
pub use updates::{app_router, updates_routes, UpdatesApiError, UpdatesAppState};
