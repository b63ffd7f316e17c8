//! Core trait definition for job-fit predictors.
//!
//! The trait is implemented by the `jobfit-predictors` crate. The session store
//! calls it exactly once per assessment, when the engine signals completion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::round2;

// ---------------------------------------------------------------------------
// Fit predictor trait
// ---------------------------------------------------------------------------

/// Turns a final skill score and a trust score into a job-fit prediction.
pub trait FitPredictor: Send + Sync {
    /// Which backend produced the score; tags the category label.
    fn source(&self) -> ScoringSource;

    /// Raw job-fit score in `[0, 100]` for the given inputs.
    fn job_fit_score(&self, skill_score: f64, trust_score: f64) -> f64;

    /// Full prediction: rounded scores plus the thresholded category.
    fn predict(&self, skill_score: f64, trust_score: f64) -> FitPrediction {
        let job_fit_score = round2(self.job_fit_score(skill_score, trust_score).clamp(0.0, 100.0));
        FitPrediction {
            skill_score: round2(skill_score),
            trust_score: round2(trust_score),
            job_fit_score,
            category: FitCategory::from_score(job_fit_score),
            source: self.source(),
        }
    }
}

/// The backend behind a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSource {
    /// A trained classifier artifact.
    TrainedModel,
    /// The fixed-weight linear fallback.
    Simulation,
}

impl fmt::Display for ScoringSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringSource::TrainedModel => write!(f, "Trained Model"),
            ScoringSource::Simulation => write!(f, "Simulation"),
        }
    }
}

/// Job-fit band derived from the job-fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitCategory {
    Excellent,
    High,
    Moderate,
    Low,
}

impl FitCategory {
    /// `>= 80` Excellent, `>= 65` High, `>= 45` Moderate, otherwise Low.
    pub fn from_score(job_fit_score: f64) -> Self {
        if job_fit_score >= 80.0 {
            FitCategory::Excellent
        } else if job_fit_score >= 65.0 {
            FitCategory::High
        } else if job_fit_score >= 45.0 {
            FitCategory::Moderate
        } else {
            FitCategory::Low
        }
    }
}

impl fmt::Display for FitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitCategory::Excellent => write!(f, "Excellent Fit"),
            FitCategory::High => write!(f, "High Fit"),
            FitCategory::Moderate => write!(f, "Moderate Fit"),
            FitCategory::Low => write!(f, "Low Fit"),
        }
    }
}

/// Result of a job-fit prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitPrediction {
    pub skill_score: f64,
    pub trust_score: f64,
    pub job_fit_score: f64,
    pub category: FitCategory,
    pub source: ScoringSource,
}

impl FitPrediction {
    /// Category label tagged with its source, e.g. `Excellent Fit (Simulation)`.
    pub fn category_label(&self) -> String {
        format!("{} ({})", self.category, self.source)
    }
}
