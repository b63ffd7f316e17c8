//! jobfit configuration and predictor factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use jobfit_core::engine::EngineConfig;
use jobfit_core::store::SessionStoreConfig;
use jobfit_core::traits::FitPredictor;

use crate::classifier::{ClassifierFitPredictor, LogisticClassifier};
use crate::linear::{LinearFitPredictor, DEFAULT_SKILL_WEIGHT, DEFAULT_TRUST_WEIGHT};

/// Which job-fit backend to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PredictorConfig {
    Linear {
        #[serde(default = "default_skill_weight")]
        skill_weight: f64,
        #[serde(default = "default_trust_weight")]
        trust_weight: f64,
    },
    Classifier {
        /// Path to the JSON classifier artifact.
        model_path: PathBuf,
    },
}

fn default_skill_weight() -> f64 {
    DEFAULT_SKILL_WEIGHT
}
fn default_trust_weight() -> f64 {
    DEFAULT_TRUST_WEIGHT
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig::Linear {
            skill_weight: DEFAULT_SKILL_WEIGHT,
            trust_weight: DEFAULT_TRUST_WEIGHT,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Assessment and session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSettings {
    /// Answers per assessment.
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
    /// Trust score used when a request does not supply one.
    #[serde(default = "default_trust_score")]
    pub default_trust_score: f64,
    /// Idle time before a session expires; 0 disables expiry.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// How often the server sweeps expired sessions.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_max_questions() -> u32 {
    10
}
fn default_trust_score() -> f64 {
    85.0
}
fn default_session_ttl() -> u64 {
    1800
}
fn default_sweep_interval() -> u64 {
    60
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            default_trust_score: default_trust_score(),
            session_ttl_secs: default_session_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl AssessmentSettings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_questions: self.max_questions,
        }
    }

    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            engine: self.engine_config(),
            idle_ttl: (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs)),
            default_trust_score: self.default_trust_score,
        }
    }
}

/// Top-level jobfit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobfitConfig {
    /// CSV item bank.
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub assessment: AssessmentSettings,
    #[serde(default)]
    pub predictor: PredictorConfig,
}

fn default_dataset() -> PathBuf {
    PathBuf::from("data/assessment_data.csv")
}

impl Default for JobfitConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            server: ServerSettings::default(),
            assessment: AssessmentSettings::default(),
            predictor: PredictorConfig::default(),
        }
    }
}

impl JobfitConfig {
    /// Reject settings no assessment could run with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.assessment.max_questions >= 1,
            "assessment.max_questions must be at least 1"
        );
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.assessment.default_trust_score),
            "assessment.default_trust_score must be within [0, 100]"
        );
        anyhow::ensure!(
            self.assessment.sweep_interval_secs >= 1,
            "assessment.sweep_interval_secs must be at least 1"
        );
        if let PredictorConfig::Linear {
            skill_weight,
            trust_weight,
        } = &self.predictor
        {
            LinearFitPredictor::new(*skill_weight, *trust_weight)?;
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = lookup(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
    }
    result
}

fn resolve_path(path: &Path, lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy(), lookup))
}

/// Apply `JOBFIT_DATASET` / `JOBFIT_MODEL_PATH` overrides and resolve `${VAR}` references.
fn apply_env(mut config: JobfitConfig, lookup: impl Fn(&str) -> Option<String>) -> JobfitConfig {
    if let Some(dataset) = lookup("JOBFIT_DATASET") {
        config.dataset = PathBuf::from(dataset);
    }
    if let Some(model_path) = lookup("JOBFIT_MODEL_PATH") {
        config.predictor = PredictorConfig::Classifier {
            model_path: PathBuf::from(model_path),
        };
    }

    config.dataset = resolve_path(&config.dataset, &lookup);
    if let PredictorConfig::Classifier { model_path } = &mut config.predictor {
        *model_path = resolve_path(model_path, &lookup);
    }
    config
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `jobfit.toml` in the current directory
/// 2. `~/.config/jobfit/config.toml`
///
/// Environment variable overrides: `JOBFIT_DATASET`, `JOBFIT_MODEL_PATH`.
pub fn load_config() -> Result<JobfitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<JobfitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("jobfit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => JobfitConfig::default(),
    };

    let config = apply_env(config, |name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<JobfitConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<JobfitConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("jobfit"))
}

/// Build the configured predictor, falling back to the linear formula.
///
/// The choice is logged; a missing or unreadable classifier artifact is a
/// warning, never an error.
pub fn select_predictor(config: &PredictorConfig) -> Arc<dyn FitPredictor> {
    match config {
        PredictorConfig::Classifier { model_path } => match LogisticClassifier::load(model_path) {
            Ok(model) => {
                tracing::info!("trained fit model loaded from {}", model_path.display());
                Arc::new(ClassifierFitPredictor::new(Box::new(model)))
            }
            Err(e) => {
                tracing::warn!("{e}; falling back to fixed simulation weights");
                Arc::new(LinearFitPredictor::default())
            }
        },
        PredictorConfig::Linear {
            skill_weight,
            trust_weight,
        } => match LinearFitPredictor::new(*skill_weight, *trust_weight) {
            Ok(predictor) => {
                tracing::info!(
                    "using linear fit predictor (skill={}, trust={})",
                    predictor.skill_weight(),
                    predictor.trust_weight()
                );
                Arc::new(predictor)
            }
            Err(e) => {
                tracing::warn!("{e}; using default simulation weights");
                Arc::new(LinearFitPredictor::default())
            }
        },
    }
}
