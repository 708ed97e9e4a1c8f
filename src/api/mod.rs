//! API module for the diagnostic HTTP endpoints
//!
//! This module exposes the log viewer operations (tail, export, clear) over
//! HTTP so the log can be inspected without shell access to the device.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
