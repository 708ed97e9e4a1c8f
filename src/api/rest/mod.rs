//! REST API module for HTTP endpoints
//!
//! Provides the log viewer endpoints:
//! - `GET /api/logs` - Full active log as plain text
//! - `POST /api/logs` - Append an entry
//! - `DELETE /api/logs` - Clear the log
//! - `GET /api/logs/recent` - Last N records, parsed
//! - `POST /api/logs/export` - Snapshot the log to the export directory
//! - `GET /api/logs/stats` - File sizes and record count

pub mod logs;

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Total count (for list responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, total: None }
    }

    pub fn with_total(data: T, total: usize) -> Self {
        Self {
            data,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}
