//! Application state.

use std::sync::Arc;

use billbook_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
///
/// All mutable state lives in the store; the state itself is cheap to clone
/// and safe to share.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }
}
