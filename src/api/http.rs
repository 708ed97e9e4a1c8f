//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::logs;
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // The viewer is opened from a device browser on the local network
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/logs",
            get(logs::get_logs)
                .post(logs::append_log)
                .delete(logs::clear_logs),
        )
        .route("/api/logs/recent", get(logs::get_recent_logs))
        .route("/api/logs/export", post(logs::export_logs))
        .route("/api/logs/stats", get(logs::get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_store::{LogStore, LogStoreConfig, CLEARED_MESSAGE, NO_LOGS_PLACEHOLDER};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_app() -> (Router, Arc<LogStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = LogStoreConfig::new(temp_dir.path().join("docs"))
            .with_export_dir(temp_dir.path().join("cache"));
        let store = Arc::new(LogStore::with_config(config));
        let app = create_router(Arc::new(AppState::new(store.clone())));
        (app, store, temp_dir)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _store, _temp_dir) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_get_logs_placeholder() {
        let (app, _store, _temp_dir) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/api/logs").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, NO_LOGS_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_append_then_recent() {
        let (app, _store, _temp_dir) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/logs")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"level":"info","message":"order placed","data":{"orderId":42}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/logs/recent?lines=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"]["lines"][0]["level"], "INFO");
        assert_eq!(json["data"]["lines"][0]["message"], "order placed");
        assert_eq!(json["data"]["lines"][0]["data"]["orderId"], 42);
    }

    #[tokio::test]
    async fn test_append_rejects_unknown_level() {
        let (app, _store, _temp_dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/logs")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"level":"fatal","message":"boom"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_clear_endpoint() {
        let (app, store, _temp_dir) = test_app();
        store.info("before clear", None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/logs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let logs = store.get_logs().await;
        assert_eq!(logs.lines().count(), 1);
        assert!(logs.contains(CLEARED_MESSAGE));
    }

    #[tokio::test]
    async fn test_export_endpoint() {
        let (app, store, _temp_dir) = test_app();
        store.warn("exported line", None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/logs/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        let path = json["data"]["path"].as_str().unwrap();
        let exported = std::fs::read_to_string(path).unwrap();
        assert!(exported.contains("[WARN] exported line"));
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let (app, store, _temp_dir) = test_app();
        store.initialize().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/logs/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["data"]["lineCount"], 2);
        assert_eq!(json["data"]["initialized"], true);
        assert_eq!(json["data"]["rotationPending"], false);
        assert_eq!(json["data"]["totalSize"], json["data"]["activeSize"]);

        let active_size = json["data"]["activeSize"].as_u64().unwrap();
        assert_eq!(
            json["data"]["totalSizeHuman"],
            format!("{} B", active_size).as_str()
        );
    }

    #[tokio::test]
    async fn test_recent_on_fresh_store_is_empty() {
        let (app, _store, _temp_dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/logs/recent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["data"]["lines"].as_array().unwrap().len(), 0);
        assert_eq!(json["data"]["text"], NO_LOGS_PLACEHOLDER);
    }
}
