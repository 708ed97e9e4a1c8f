//! Log Rotation
//!
//! Single-generation rotation: when the active log grows past the size
//! threshold it is renamed to `app.log.old`, replacing any earlier backup,
//! and the next append starts a fresh `app.log`. At most two generations
//! exist at any time, so disk usage stays around twice the threshold.

use std::io;
use std::path::PathBuf;

use tokio::fs;
use tracing::info;

use super::store::{LogStoreConfig, LogStoreResult};
use crate::utils::replace_rename;

/// Rotation manager for the active log
///
/// Holds no lock of its own. `LogStore` only calls it while holding its
/// file lock; using it directly alongside a live store on the same paths
/// can race with appends.
pub struct LogRotation {
    config: LogStoreConfig,
}

impl LogRotation {
    /// Create a new LogRotation manager
    pub fn new(config: LogStoreConfig) -> Self {
        Self { config }
    }

    /// Size of the active log, `None` when it does not exist
    pub async fn active_size(&self) -> LogStoreResult<Option<u64>> {
        match fs::metadata(self.config.log_path()).await {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the active log is strictly larger than the threshold
    pub async fn needs_rotation(&self) -> LogStoreResult<bool> {
        Ok(self
            .active_size()
            .await?
            .is_some_and(|size| size > self.config.max_file_size))
    }

    /// Demote the active log to the backup path
    ///
    /// # Returns
    /// * `Ok(Some(info))` - The active log was moved
    /// * `Ok(None)` - There was no active log to move
    pub async fn rotate(&self) -> LogStoreResult<Option<RotationInfo>> {
        let Some(rotated_bytes) = self.active_size().await? else {
            return Ok(None);
        };

        let log_path = self.config.log_path();
        let backup_path = self.config.backup_path();

        if !replace_rename(&log_path, &backup_path).await? {
            return Ok(None);
        }

        info!(
            bytes = rotated_bytes,
            backup = %backup_path.display(),
            "Rotated application log"
        );

        Ok(Some(RotationInfo {
            backup_path,
            rotated_bytes,
        }))
    }
}

/// Outcome of a rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationInfo {
    /// Where the previous generation now lives
    pub backup_path: PathBuf,
    /// Size of the generation that was moved
    pub rotated_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn setup(max_file_size: u64) -> (LogRotation, LogStoreConfig, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = LogStoreConfig::new(temp_dir.path()).with_max_file_size(max_file_size);
        (LogRotation::new(config.clone()), config, temp_dir)
    }

    #[tokio::test]
    async fn test_needs_rotation_threshold_is_strict() {
        let (rotation, config, _temp_dir) = setup(10);

        assert!(!rotation.needs_rotation().await.unwrap());

        std_fs::write(config.log_path(), "0123456789").unwrap();
        assert!(!rotation.needs_rotation().await.unwrap());

        std_fs::write(config.log_path(), "0123456789A").unwrap();
        assert!(rotation.needs_rotation().await.unwrap());
    }

    #[tokio::test]
    async fn test_rotate_moves_active_to_backup() {
        let (rotation, config, _temp_dir) = setup(10);
        std_fs::write(config.log_path(), "current generation\n").unwrap();
        std_fs::write(config.backup_path(), "stale generation\n").unwrap();

        let info = rotation.rotate().await.unwrap().unwrap();

        assert_eq!(info.backup_path, config.backup_path());
        assert_eq!(info.rotated_bytes, "current generation\n".len() as u64);
        assert!(!config.log_path().exists());
        assert_eq!(
            std_fs::read_to_string(config.backup_path()).unwrap(),
            "current generation\n"
        );
    }

    #[tokio::test]
    async fn test_rotate_without_active_file() {
        let (rotation, config, _temp_dir) = setup(10);
        std_fs::write(config.backup_path(), "keep me\n").unwrap();

        assert_eq!(rotation.rotate().await.unwrap(), None);
        assert_eq!(
            std_fs::read_to_string(config.backup_path()).unwrap(),
            "keep me\n"
        );
    }
}
