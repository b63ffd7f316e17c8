//! jobfit-server - HTTP service for adaptive assessments
//!
//! Owns the session store behind an axum router and runs a background task
//! that expires idle sessions.

mod error;
pub mod http;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use jobfit_core::SessionStore;

pub use error::{ApiError, ErrorResponse, ServerError};
pub use http::create_router;
pub use state::AppState;

/// Listener and housekeeping settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often idle sessions are swept.
    pub sweep_interval: Duration,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// The jobfit HTTP server
pub struct JobfitServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl JobfitServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Run the server until Ctrl-C, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("jobfit server listening on {}", addr);

        let sweeper = spawn_expiry_sweeper(Arc::clone(&self.state.store), self.config.sweep_interval);

        let router = create_router(self.state);
        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()));

        sweeper.abort();
        tracing::info!("jobfit server stopped");
        served
    }
}

/// Periodically drop sessions that have been idle past their TTL.
pub fn spawn_expiry_sweeper(store: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_expired();
            tracing::trace!("expiry sweep removed {evicted} session(s)");
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
