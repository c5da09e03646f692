//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the log store behind a trait object so the same router serves
//! the in-memory and Postgres backends.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::LogStore;

/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LogStore>,
    pub page_size: usize,
    /// Bearer token admin routes require, if any.
    pub token: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>, config: &ServerConfig) -> Self {
        Self { store, page_size: config.page_size, token: config.token.as_deref().map(Arc::from) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
