//! Data types for the application log
//!
//! This module contains the log line model shared by the store and the API.

mod entry;
mod level;

pub use entry::{LogEntry, DATA_SEPARATOR};
pub use level::{LogLevel, ParseLevelError};
