//! The `jobfit serve` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use jobfit_core::parser::load_item_bank;
use jobfit_predictors::select_predictor;
use jobfit_server::{AppState, JobfitServer, ServerConfig};

pub async fn execute(
    config_path: Option<PathBuf>,
    dataset: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let settings = super::load_settings(config_path, dataset)?;

    // A missing or invalid bank is fatal: nothing could be served.
    let bank = load_item_bank(&settings.dataset)
        .with_context(|| format!("cannot serve without a dataset ({})", settings.dataset.display()))?;
    let predictor = select_predictor(&settings.predictor);
    match settings.assessment.session_ttl_secs {
        0 => tracing::info!("idle sessions never expire"),
        ttl => tracing::info!("idle sessions expire after {ttl}s"),
    }

    let state = AppState::new(
        Arc::new(bank),
        predictor,
        settings.assessment.store_config(),
    );
    let server_config = ServerConfig {
        host: host.unwrap_or(settings.server.host),
        port: port.unwrap_or(settings.server.port),
        sweep_interval: Duration::from_secs(settings.assessment.sweep_interval_secs),
    };

    JobfitServer::new(server_config, Arc::new(state)).run().await?;
    Ok(())
}
