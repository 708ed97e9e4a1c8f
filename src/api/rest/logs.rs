//! Log viewer endpoints

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, ApiResponse};
use crate::api::state::AppState;
use crate::log_store::{LOGS_UNAVAILABLE, NO_LOGS_PLACEHOLDER};
use crate::types::{LogEntry, LogLevel};

/// Upper bound for `lines` on the recent endpoint
pub const MAX_RECENT_LINES: usize = 10_000;

/// Query parameters for the recent endpoint
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    /// Number of records to return (default: store setting, max: 10000)
    pub lines: Option<usize>,
}

/// Body of `POST /api/logs`
#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// One record of the recent view; lines that do not parse are passed through raw
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecentLine {
    Parsed(LogEntry),
    Raw { raw: String },
}

impl RecentLine {
    fn from_line(line: &str) -> Self {
        match LogEntry::parse_line(line) {
            Some(entry) => RecentLine::Parsed(entry),
            None => RecentLine::Raw {
                raw: line.to_string(),
            },
        }
    }
}

/// Payload of the recent endpoint
#[derive(Debug, Serialize)]
pub struct RecentLogs {
    pub lines: Vec<RecentLine>,
    pub text: String,
}

/// Payload of the export endpoint
#[derive(Debug, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
}

fn parse_lines(text: &str) -> Vec<RecentLine> {
    // Placeholder text is not a record
    if text.is_empty() || text == NO_LOGS_PLACEHOLDER || text == LOGS_UNAVAILABLE {
        return Vec::new();
    }
    text.split('\n').map(RecentLine::from_line).collect()
}

/// GET /api/logs - Full active log as plain text
pub async fn get_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let logs = state.store.get_logs().await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        logs,
    )
}

/// GET /api/logs/recent - Last N records
pub async fn get_recent_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> impl IntoResponse {
    let lines = params
        .lines
        .unwrap_or(state.store.config().default_recent_lines)
        .min(MAX_RECENT_LINES);

    let text = state.store.get_recent_logs(Some(lines)).await;
    let parsed = parse_lines(&text);

    let total = parsed.len();
    (
        StatusCode::OK,
        Json(ApiResponse::with_total(
            RecentLogs {
                lines: parsed,
                text,
            },
            total,
        )),
    )
}

/// POST /api/logs - Append an entry on behalf of a remote client
pub async fn append_log(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AppendRequest>,
) -> impl IntoResponse {
    let level = match request.level.parse::<LogLevel>() {
        Ok(level) => level,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(e.to_string())))
                .into_response()
        }
    };

    state.store.append(level, request.message, request.data).await;
    StatusCode::NO_CONTENT.into_response()
}

/// DELETE /api/logs - Clear the log
pub async fn clear_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.store.clear().await;
    StatusCode::NO_CONTENT
}

/// POST /api/logs/export - Write a timestamped snapshot of the log
pub async fn export_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.export().await {
        Ok(path) => (StatusCode::OK, Json(ApiResponse::new(ExportResult { path }))).into_response(),
        Err(e) => {
            let error = ApiError::internal(e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}

/// GET /api/logs/stats - File sizes, record count and rotation state
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.stats().await {
        Ok(stats) => (StatusCode::OK, Json(ApiResponse::new(stats.summary()))).into_response(),
        Err(e) => {
            let error = ApiError::internal(e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}
