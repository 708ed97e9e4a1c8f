//! Wajba application log
//!
//! A durable, append-only text log for the Wajba food-delivery app with
//! single-generation size rotation and a small diagnostic HTTP viewer.
//!
//! # Features
//!
//! - **Never throws**: append, read and clear report I/O failures through
//!   `tracing` instead of returning them
//! - **Bounded disk usage**: `app.log` is demoted to `app.log.old` once it
//!   passes 5 MiB, keeping at most two generations
//! - **Serialized writes**: concurrent appends from many tasks never lose lines
//! - **Export**: timestamped snapshots for sharing with support
//!
//! # Modules
//!
//! - `types`: Log levels and the line format
//! - `log_store`: The store, rotation and statistics
//! - `api`: Diagnostic HTTP endpoints
//! - `utils`: Atomic file helpers and timestamps
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use wajba_logs::{LogStore, LogStoreConfig};
//!
//! # async fn run() {
//! let store = LogStore::with_config(LogStoreConfig::new("/data/documents"));
//! store.initialize().await;
//! store.info("order placed", Some(json!({ "orderId": 42 }))).await;
//!
//! let recent = store.get_recent_logs(Some(20)).await;
//! println!("{}", recent);
//! # }
//! ```

pub mod api;
pub mod log_store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use log_store::{
    LogRotation, LogStore, LogStoreConfig, LogStoreError, LogStoreResult, LogStoreStats,
    RotationInfo, StatsSummary,
};
pub use types::{LogEntry, LogLevel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
