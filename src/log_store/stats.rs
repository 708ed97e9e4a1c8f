//! Log Store Statistics
//!
//! Size and record counts for the active log and its backup, as shown by
//! the diagnostic API.

use std::path::PathBuf;

use serde::Serialize;

/// Statistics about the log files
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStoreStats {
    /// Path of the active log
    pub log_path: PathBuf,
    /// Size of the active log in bytes
    pub active_size: u64,
    /// Size of the rotated backup in bytes (0 when absent)
    pub backup_size: u64,
    /// Number of records in the active log
    pub line_count: usize,
    /// Rotation threshold in bytes
    pub max_file_size: u64,
    /// Whether `initialize` has run in the current lifecycle
    pub initialized: bool,
}

impl LogStoreStats {
    /// Bytes retained across both generations
    pub fn total_size(&self) -> u64 {
        self.active_size + self.backup_size
    }

    /// Whether the next `initialize` will rotate
    pub fn rotation_pending(&self) -> bool {
        self.active_size > self.max_file_size
    }

    /// Human-readable size, binary units: `512 B`, `2.0 KiB`, `5.0 MiB`
    pub fn format_size(bytes: u64) -> String {
        const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

        if bytes < 1024 {
            return format!("{} B", bytes);
        }

        let mut value = bytes as f64 / 1024.0;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        format!("{:.1} {}", value, UNITS[unit])
    }

    /// Stats plus the derived figures shown by the viewer
    pub fn summary(self) -> StatsSummary {
        StatsSummary {
            total_size: self.total_size(),
            total_size_human: Self::format_size(self.total_size()),
            active_size_human: Self::format_size(self.active_size),
            rotation_pending: self.rotation_pending(),
            stats: self,
        }
    }
}

/// [`LogStoreStats`] with totals and readable sizes, as served by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    #[serde(flatten)]
    pub stats: LogStoreStats,
    pub total_size: u64,
    pub total_size_human: String,
    pub active_size_human: String,
    pub rotation_pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(active_size: u64, backup_size: u64) -> LogStoreStats {
        LogStoreStats {
            log_path: PathBuf::from("logs/app.log"),
            active_size,
            backup_size,
            line_count: 0,
            max_file_size: 5 * 1024 * 1024,
            initialized: true,
        }
    }

    #[test]
    fn test_total_and_pending() {
        let s = stats(6 * 1024 * 1024, 1024);
        assert_eq!(s.total_size(), 6 * 1024 * 1024 + 1024);
        assert!(s.rotation_pending());
        assert!(!stats(5 * 1024 * 1024, 0).rotation_pending());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(LogStoreStats::format_size(0), "0 B");
        assert_eq!(LogStoreStats::format_size(1023), "1023 B");
        assert_eq!(LogStoreStats::format_size(2048), "2.0 KiB");
        assert_eq!(LogStoreStats::format_size(1536), "1.5 KiB");
        assert_eq!(LogStoreStats::format_size(5 * 1024 * 1024), "5.0 MiB");
        assert_eq!(LogStoreStats::format_size(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }

    #[test]
    fn test_summary_flattens_stats() {
        let summary = stats(6 * 1024 * 1024, 1024).summary();
        assert_eq!(summary.total_size, 6 * 1024 * 1024 + 1024);
        assert!(summary.rotation_pending);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["activeSize"], 6 * 1024 * 1024);
        assert_eq!(json["activeSizeHuman"], "6.0 MiB");
        assert_eq!(json["totalSizeHuman"], "6.0 MiB");
        assert_eq!(json["rotationPending"], true);
        assert_eq!(json["logPath"], "logs/app.log");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(stats(10, 0)).unwrap();
        assert_eq!(json["activeSize"], 10);
        assert_eq!(json["maxFileSize"], 5 * 1024 * 1024);
        assert_eq!(json["initialized"], true);
    }
}
