//! Subcommand implementations.

pub mod init;
pub mod roles;
pub mod serve;
pub mod simulate;
pub mod take;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use jobfit_predictors::config::{load_config_from, JobfitConfig};

/// Load the config file and apply a `--dataset` override.
pub fn load_settings(config: Option<PathBuf>, dataset: Option<PathBuf>) -> Result<JobfitConfig> {
    let mut settings = load_config_from(config.as_deref())?;
    if let Some(dataset) = dataset {
        settings.dataset = dataset;
    }
    Ok(settings)
}
