//! Log Store - durable append-only application log
//!
//! The LogStore owns the active log file, its single rotated backup and
//! the export directory. Writes never fail towards the caller: I/O errors
//! are reported through `tracing` and swallowed, so logging can never be
//! the reason the host application goes down. Only [`LogStore::export`]
//! and the statistics calls return errors.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{json, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::rotation::LogRotation;
use super::stats::LogStoreStats;
use crate::types::{LogEntry, LogLevel};
use crate::utils::{
    atomic_write, cleanup_temp_file, current_timestamp_ms, read_if_exists, remove_if_exists,
    AtomicError,
};

/// File name of the active log
pub const ACTIVE_LOG_FILE: &str = "app.log";

/// File name of the rotated backup
pub const BACKUP_LOG_FILE: &str = "app.log.old";

/// Prefix of exported snapshots: `wajba_logs_<unix-epoch-ms>.txt`
pub const EXPORT_FILE_PREFIX: &str = "wajba_logs_";

/// Rotation threshold (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Number of records returned by `get_recent_logs(None)`
pub const DEFAULT_RECENT_LINES: usize = 100;

/// Returned by `get_logs` when nothing has been logged yet
pub const NO_LOGS_PLACEHOLDER: &str = "No logs available yet.";

/// Returned by `get_logs` when the log can be neither read nor created
pub const LOGS_UNAVAILABLE: &str = "Unable to read logs.";

/// Bootstrap entry written first by `initialize`
pub const STARTUP_MESSAGE: &str = "=== Application started ===";

/// Bootstrap entry written second by `initialize`
pub const WELCOME_MESSAGE: &str = "Logger initialized";

/// Bootstrap entry written by `clear`
pub const CLEARED_MESSAGE: &str = "Logs cleared";

/// Configuration for the LogStore
#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    /// Directory holding `app.log` and `app.log.old`
    pub log_dir: PathBuf,
    /// Directory receiving exported snapshots
    pub export_dir: PathBuf,
    /// Size in bytes above which the active file is rotated
    pub max_file_size: u64,
    /// Default record count for `get_recent_logs`
    pub default_recent_lines: usize,
    /// Check the size before every append instead of only at initialize
    pub rotate_on_append: bool,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            export_dir: std::env::temp_dir(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            default_recent_lines: DEFAULT_RECENT_LINES,
            rotate_on_append: false,
        }
    }
}

impl LogStoreConfig {
    /// Create config with custom log directory
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `WAJBA_LOG_DIR`: log directory (default: `./logs`)
    /// - `WAJBA_EXPORT_DIR`: export directory (default: system temp dir)
    /// - `WAJBA_LOG_MAX_BYTES`: rotation threshold in bytes (default: 5 MiB)
    /// - `WAJBA_LOG_ROTATE_ON_APPEND`: `true`/`1`/`yes` to size-check every append
    pub fn from_env() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let resolve = |path: String| {
            let path = PathBuf::from(path);
            if path.is_absolute() {
                path
            } else {
                current_dir.join(path)
            }
        };

        let log_dir = std::env::var("WAJBA_LOG_DIR")
            .map(resolve)
            .unwrap_or_else(|_| current_dir.join("logs"));

        let export_dir = std::env::var("WAJBA_EXPORT_DIR")
            .map(resolve)
            .unwrap_or_else(|_| std::env::temp_dir());

        let max_file_size = match std::env::var("WAJBA_LOG_MAX_BYTES") {
            Ok(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, "WAJBA_LOG_MAX_BYTES is not a byte count, using default");
                DEFAULT_MAX_FILE_SIZE
            }),
            Err(_) => DEFAULT_MAX_FILE_SIZE,
        };

        let rotate_on_append = std::env::var("WAJBA_LOG_ROTATE_ON_APPEND")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Self {
            log_dir,
            export_dir,
            max_file_size,
            default_recent_lines: DEFAULT_RECENT_LINES,
            rotate_on_append,
        }
    }

    pub fn with_export_dir<P: AsRef<Path>>(mut self, export_dir: P) -> Self {
        self.export_dir = export_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn with_default_recent_lines(mut self, lines: usize) -> Self {
        self.default_recent_lines = lines;
        self
    }

    pub fn with_rotate_on_append(mut self, enabled: bool) -> Self {
        self.rotate_on_append = enabled;
        self
    }

    /// Get path to app.log
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(ACTIVE_LOG_FILE)
    }

    /// Get path to app.log.old
    pub fn backup_path(&self) -> PathBuf {
        self.log_dir.join(BACKUP_LOG_FILE)
    }

    /// Get path of an export taken at `timestamp_ms`
    pub fn export_path(&self, timestamp_ms: i64) -> PathBuf {
        self.export_dir
            .join(format!("{}{}.txt", EXPORT_FILE_PREFIX, timestamp_ms))
    }
}

/// Result type for LogStore operations
pub type LogStoreResult<T> = Result<T, LogStoreError>;

/// Errors that can occur in LogStore operations
#[derive(Debug)]
pub enum LogStoreError {
    Io(io::Error),
    Json(serde_json::Error),
    InvalidPath(String),
    Export { path: PathBuf, source: AtomicError },
}

impl std::fmt::Display for LogStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogStoreError::Io(e) => write!(f, "IO error: {}", e),
            LogStoreError::Json(e) => write!(f, "JSON error: {}", e),
            LogStoreError::InvalidPath(path) => write!(f, "Invalid log path: {}", path),
            LogStoreError::Export { path, source } => {
                write!(f, "Failed to export logs to {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LogStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogStoreError::Io(e) => Some(e),
            LogStoreError::Json(e) => Some(e),
            LogStoreError::InvalidPath(_) => None,
            LogStoreError::Export { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for LogStoreError {
    fn from(e: io::Error) -> Self {
        LogStoreError::Io(e)
    }
}

impl From<serde_json::Error> for LogStoreError {
    fn from(e: serde_json::Error) -> Self {
        LogStoreError::Json(e)
    }
}

impl From<AtomicError> for LogStoreError {
    fn from(e: AtomicError) -> Self {
        match e {
            AtomicError::Io(e) => LogStoreError::Io(e),
            AtomicError::InvalidPath(path) => LogStoreError::InvalidPath(path),
        }
    }
}

/// Append-only log file with single-generation rotation
///
/// Every file operation runs under one async mutex, so appends issued
/// concurrently from different tasks are applied one at a time and no
/// line is lost to an interleaved read-modify-write.
pub struct LogStore {
    config: LogStoreConfig,
    rotation: LogRotation,
    initialized: AtomicBool,
    file_lock: Mutex<()>,
}

impl LogStore {
    /// Create a store over the default configuration
    pub fn new() -> Self {
        Self::with_config(LogStoreConfig::default())
    }

    /// Create a store with custom config
    pub fn with_config(config: LogStoreConfig) -> Self {
        Self {
            rotation: LogRotation::new(config.clone()),
            config,
            initialized: AtomicBool::new(false),
            file_lock: Mutex::new(()),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &LogStoreConfig {
        &self.config
    }

    /// Path of the active log file
    pub fn log_path(&self) -> PathBuf {
        self.config.log_path()
    }

    /// Path of the rotated backup
    pub fn backup_path(&self) -> PathBuf {
        self.config.backup_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Prepare the log file and write the startup entries
    ///
    /// This is the only place where the size threshold is evaluated unless
    /// `rotate_on_append` is set. Calling it again is a no-op until
    /// [`LogStore::dispose`] is called.
    pub async fn initialize(&self) {
        let _guard = self.file_lock.lock().await;

        if self.initialized.load(Ordering::SeqCst) {
            debug!("Log store already initialized");
            return;
        }

        if let Err(e) = self.prepare_active_file().await {
            warn!(error = %e, path = %self.log_path().display(), "Failed to prepare log file");
        }
        self.initialized.store(true, Ordering::SeqCst);

        self.write_entry_or_report(&LogEntry::new(LogLevel::Info, STARTUP_MESSAGE, None))
            .await;
        self.write_entry_or_report(&LogEntry::new(
            LogLevel::Info,
            WELCOME_MESSAGE,
            Some(json!({ "logPath": self.log_path().display().to_string() })),
        ))
        .await;
    }

    /// End the current lifecycle; the next `initialize` runs in full again
    pub async fn dispose(&self) {
        let _guard = self.file_lock.lock().await;
        self.initialized.store(false, Ordering::SeqCst);
        debug!("Log store disposed");
    }

    async fn prepare_active_file(&self) -> LogStoreResult<()> {
        let log_path = self.log_path();

        if cleanup_temp_file(&log_path).await? {
            debug!(path = %log_path.display(), "Removed leftover temp file");
        }

        if self.rotation.needs_rotation().await? {
            self.rotation.rotate().await?;
        } else if !fs::try_exists(&log_path).await? {
            atomic_write(&log_path, "").await?;
        }

        Ok(())
    }

    /// Append one entry to the active log
    ///
    /// The timestamp is taken when this is called. Failures are logged
    /// through `tracing` and never returned.
    pub async fn append(&self, level: LogLevel, message: impl Into<String>, data: Option<Value>) {
        let entry = LogEntry::new(level, message, data);
        let _guard = self.file_lock.lock().await;
        self.write_entry_or_report(&entry).await;
    }

    pub async fn debug(&self, message: impl Into<String>, data: Option<Value>) {
        self.append(LogLevel::Debug, message, data).await
    }

    pub async fn info(&self, message: impl Into<String>, data: Option<Value>) {
        self.append(LogLevel::Info, message, data).await
    }

    pub async fn warn(&self, message: impl Into<String>, data: Option<Value>) {
        self.append(LogLevel::Warn, message, data).await
    }

    pub async fn error(&self, message: impl Into<String>, data: Option<Value>) {
        self.append(LogLevel::Error, message, data).await
    }

    /// Caller must hold `file_lock`
    async fn write_entry_or_report(&self, entry: &LogEntry) {
        if let Err(e) = self.write_entry(entry).await {
            warn!(
                error = %e,
                path = %self.log_path().display(),
                level = %entry.level,
                "Failed to append log entry"
            );
        }
    }

    /// Read-modify-write of the whole active file. Caller must hold `file_lock`.
    async fn write_entry(&self, entry: &LogEntry) -> LogStoreResult<()> {
        if self.config.rotate_on_append && self.rotation.needs_rotation().await? {
            self.rotation.rotate().await?;
        }

        let line = entry.to_line()?;
        let log_path = self.log_path();

        let mut content = read_if_exists(&log_path).await?.unwrap_or_default();
        content.reserve(line.len() + 1);
        content.push_str(&line);
        content.push('\n');

        atomic_write(&log_path, &content).await?;
        Ok(())
    }

    /// Full contents of the active log
    ///
    /// When there is no log yet an empty file is created and
    /// [`NO_LOGS_PLACEHOLDER`] is returned. If even that fails the result
    /// is [`LOGS_UNAVAILABLE`].
    pub async fn get_logs(&self) -> String {
        let _guard = self.file_lock.lock().await;
        self.read_logs_locked().await
    }

    async fn read_logs_locked(&self) -> String {
        let log_path = self.log_path();

        match fs::read(&log_path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(error = %e, path = %log_path.display(), "Failed to read log file");
                }
                match self.ensure_log_file().await {
                    Ok(()) => NO_LOGS_PLACEHOLDER.to_string(),
                    Err(e) => {
                        error!(error = %e, path = %log_path.display(), "Failed to create log file");
                        LOGS_UNAVAILABLE.to_string()
                    }
                }
            }
        }
    }

    /// Create the active file if missing, leaving existing content alone
    async fn ensure_log_file(&self) -> LogStoreResult<()> {
        fs::create_dir_all(&self.config.log_dir).await?;
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())
            .await?;
        Ok(())
    }

    /// The last `n` records of the log, oldest first
    ///
    /// `None` uses the configured default of [`DEFAULT_RECENT_LINES`].
    pub async fn get_recent_logs(&self, n: Option<usize>) -> String {
        let n = n.unwrap_or(self.config.default_recent_lines);
        let logs = self.get_logs().await;
        tail_lines(&logs, n)
    }

    /// Delete the active log and start over with a single "cleared" entry
    pub async fn clear(&self) {
        let _guard = self.file_lock.lock().await;

        let log_path = self.log_path();
        if let Err(e) = remove_if_exists(&log_path).await {
            warn!(error = %e, path = %log_path.display(), "Failed to delete log file");
        }

        self.write_entry_or_report(&LogEntry::new(LogLevel::Info, CLEARED_MESSAGE, None))
            .await;
    }

    /// Copy the current log to a new timestamped file in the export directory
    ///
    /// The active file is left untouched. Unlike the other operations a
    /// failure here is returned, so the caller can tell the user the export
    /// did not happen.
    pub async fn export(&self) -> LogStoreResult<PathBuf> {
        let _guard = self.file_lock.lock().await;

        let content = self.read_logs_locked().await;
        let export_path = self.next_export_path().await;

        atomic_write(&export_path, &content)
            .await
            .map_err(|source| LogStoreError::Export {
                path: export_path.clone(),
                source,
            })?;

        info!(
            path = %export_path.display(),
            bytes = content.len(),
            "Exported application log"
        );

        Ok(export_path)
    }

    /// First free export name at or after the current millisecond
    async fn next_export_path(&self) -> PathBuf {
        let mut timestamp_ms = current_timestamp_ms();
        let mut candidate = self.config.export_path(timestamp_ms);

        while fs::try_exists(&candidate).await.unwrap_or(false) {
            timestamp_ms += 1;
            candidate = self.config.export_path(timestamp_ms);
        }

        candidate
    }

    /// Contents of the rotated backup, if one exists
    pub async fn read_backup(&self) -> LogStoreResult<Option<String>> {
        let _guard = self.file_lock.lock().await;
        Ok(read_if_exists(self.backup_path()).await?)
    }

    /// Sizes and line count of the log files
    pub async fn stats(&self) -> LogStoreResult<LogStoreStats> {
        let _guard = self.file_lock.lock().await;

        let active = read_if_exists(self.log_path()).await?;
        let active_size = file_size(&self.log_path()).await?;
        let backup_size = file_size(&self.backup_path()).await?;

        Ok(LogStoreStats {
            log_path: self.log_path(),
            active_size,
            backup_size,
            line_count: active.as_deref().map_or(0, |c| c.lines().count()),
            max_file_size: self.config.max_file_size,
            initialized: self.is_initialized(),
        })
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Size on disk in bytes, 0 when the file does not exist
async fn file_size(path: &Path) -> LogStoreResult<u64> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Last `n` newline-separated records of `text`, rejoined with `\n`
///
/// The empty element produced by a trailing newline is not counted as a
/// record.
pub fn tail_lines(text: &str, n: usize) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
