//! Log Store Module
//!
//! This module provides the persistent application log:
//! - `LogStore`: append, read, clear and export over one active file
//! - `LogRotation`: demotes an oversized active file to its backup
//! - `LogStoreStats`: sizes and record counts for diagnostics
//!
//! # Architecture
//!
//! ```text
//! Startup:
//! ┌──────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │ initialize() │───►│ size > 5 MiB ?   │───►│ app.log ──────► │
//! │ (once)       │    │ (rotation check) │    │ app.log.old     │
//! └──────────────┘    └──────────────────┘    └─────────────────┘
//!
//! Write Path (serialized by the store's file lock):
//! ┌─────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ append  │───►│ read app.log │───►│ atomic write of  │
//! │ (level) │    │ (or empty)   │    │ content + line   │
//! └─────────┘    └──────────────┘    └──────────────────┘
//!
//! Diagnostics:
//!   get_logs / get_recent_logs(n) / clear / export ──► wajba_logs_<ms>.txt
//! ```

mod rotation;
mod stats;
mod store;

pub use rotation::{LogRotation, RotationInfo};
pub use stats::{LogStoreStats, StatsSummary};
pub use store::{
    tail_lines, LogStore, LogStoreConfig, LogStoreError, LogStoreResult, ACTIVE_LOG_FILE,
    BACKUP_LOG_FILE, CLEARED_MESSAGE, DEFAULT_MAX_FILE_SIZE, DEFAULT_RECENT_LINES,
    EXPORT_FILE_PREFIX, LOGS_UNAVAILABLE, NO_LOGS_PLACEHOLDER, STARTUP_MESSAGE, WELCOME_MESSAGE,
};
