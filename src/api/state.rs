//! Shared application state for the diagnostic API

use std::sync::Arc;

use crate::log_store::LogStore;

/// State handed to every request handler
pub struct AppState {
    /// The application log
    pub store: Arc<LogStore>,
}

impl AppState {
    /// Create a new AppState over the given store
    pub fn new(store: Arc<LogStore>) -> Self {
        Self { store }
    }
}
