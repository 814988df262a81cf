//! HTTP DTOs for update feed endpoints.
//!
//! `DaoUpdate` is already designed for serialization, so feed responses use
//! it directly.

pub use crate::domain::updates::DaoUpdate;

use serde::{Deserialize, Serialize};

use crate::application::UserHoldings;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/updates`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatesRequest {
    pub dao_slugs: Vec<String>,
    #[serde(default)]
    pub user_holdings: Option<UserHoldings>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }
}
