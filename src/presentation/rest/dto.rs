use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /api/stocks`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub exchange: Option<String>,
    /// Comma-separated symbols.
    #[serde(default)]
    pub symbols: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for `GET /api/stocks/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for `GET /api/stocks/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub exchange: Option<String>,
}

/// Success envelope shared by every data endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: Option<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
            message,
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Currently connected streaming clients.
    pub connections: usize,
}

impl HealthResponse {
    pub fn ok(connections: usize) -> Self {
        HealthResponse {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            connections,
        }
    }
}
