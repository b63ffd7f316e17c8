//! Predictor error types.

use thiserror::Error;

/// Errors that can occur while building a job-fit predictor.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// The model artifact could not be read.
    #[error("failed to read model artifact {path}: {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The model artifact is not a valid classifier description.
    #[error("failed to parse model artifact {path}: {message}")]
    ArtifactParse { path: String, message: String },

    /// The classifier parameters are unusable.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The linear weights are unusable.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
}
