//! Utility functions and helpers
//!
//! This module contains timestamp utilities and atomic file helpers.

pub mod atomic;
pub mod time;

pub use atomic::{
    atomic_write, cleanup_temp_file, read_if_exists, remove_if_exists, replace_rename,
    AtomicError, AtomicResult,
};
pub use time::current_timestamp_ms;
