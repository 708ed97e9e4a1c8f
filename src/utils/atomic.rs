//! Atomic file operations
//!
//! This module provides async helpers for writing the log file without
//! leaving a half-written file behind after a crash or power failure.
//!
//! # Pattern
//!
//! 1. Write to a sibling temporary file (`<name>.tmp`)
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on most filesystems)
//!
//! The final file is therefore either the old version or the new version,
//! never a partial one.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Extension used for in-flight temp files
pub const TEMP_EXTENSION: &str = "tmp";

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug)]
pub enum AtomicError {
    Io(io::Error),
    InvalidPath(String),
}

impl std::fmt::Display for AtomicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicError::Io(e) => write!(f, "IO error: {}", e),
            AtomicError::InvalidPath(path) => write!(f, "Path has no file name: {}", path),
        }
    }
}

impl std::error::Error for AtomicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtomicError::Io(e) => Some(e),
            AtomicError::InvalidPath(_) => None,
        }
    }
}

impl From<io::Error> for AtomicError {
    fn from(e: io::Error) -> Self {
        AtomicError::Io(e)
    }
}

/// Temp path next to `path`: `app.log` becomes `app.log.tmp`
pub fn temp_path_for(path: &Path) -> AtomicResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AtomicError::InvalidPath(path.display().to_string()))?;

    let mut temp_name = OsString::from(file_name);
    temp_name.push(".");
    temp_name.push(TEMP_EXTENSION);

    Ok(path.with_file_name(temp_name))
}

/// Atomically replace the content of a file
///
/// Creates the parent directory when it is missing.
///
/// # Example
///
/// ```ignore
/// atomic_write("logs/app.log", "line1\nline2\n").await?;
/// ```
pub async fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> AtomicResult<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Read a file to a string, treating a missing file as `None`
///
/// Invalid UTF-8 is replaced with U+FFFD rather than failing the read.
pub async fn read_if_exists<P: AsRef<Path>>(path: P) -> AtomicResult<Option<String>> {
    match fs::read(path.as_ref()).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete a file; a file that is already gone is not an error
///
/// # Returns
///
/// * `Ok(true)` - The file existed and was removed
/// * `Ok(false)` - There was nothing to remove
pub async fn remove_if_exists<P: AsRef<Path>>(path: P) -> AtomicResult<bool> {
    match fs::remove_file(path.as_ref()).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Move `from` onto `to`, discarding whatever was at `to`
///
/// # Returns
///
/// * `Ok(true)` - File was moved
/// * `Ok(false)` - Source file doesn't exist
/// * `Err(...)` - An error occurred
pub async fn replace_rename<P1, P2>(from: P1, to: P2) -> AtomicResult<bool>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let from = from.as_ref();
    let to = to.as_ref();

    if !fs::try_exists(from).await? {
        return Ok(false);
    }

    remove_if_exists(to).await?;
    fs::rename(from, to).await?;

    Ok(true)
}

/// Remove a temp file left over from an interrupted [`atomic_write`]
pub async fn cleanup_temp_file<P: AsRef<Path>>(path: P) -> AtomicResult<bool> {
    let temp_path = temp_path_for(path.as_ref())?;
    remove_if_exists(temp_path).await
}
