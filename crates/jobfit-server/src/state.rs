//! Shared application state for the jobfit server

use std::sync::Arc;
use std::time::Instant;

use jobfit_core::{FitPredictor, ItemBank, SessionStore, SessionStoreConfig};

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable item bank loaded at startup
    pub bank: Arc<ItemBank>,
    /// Live assessment sessions
    pub store: Arc<SessionStore>,
    /// When the server started
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        bank: Arc<ItemBank>,
        predictor: Arc<dyn FitPredictor>,
        config: SessionStoreConfig,
    ) -> Self {
        let store = Arc::new(SessionStore::new(Arc::clone(&bank), predictor, config));
        Self {
            bank,
            store,
            started_at: Instant::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
