//! jobfit-predictors - Job-fit predictor backends.
//!
//! Implements the `FitPredictor` trait with a trained-classifier backend and a
//! fixed-weight linear fallback, and owns the jobfit configuration file.

pub mod classifier;
pub mod config;
pub mod error;
pub mod linear;
pub mod mock;

pub use classifier::{Classifier, ClassifierFitPredictor, LogisticClassifier};
pub use config::{load_config, select_predictor, JobfitConfig, PredictorConfig};
pub use error::PredictorError;
pub use linear::LinearFitPredictor;
pub use mock::MockPredictor;
