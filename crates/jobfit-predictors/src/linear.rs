//! Fixed-weight linear fallback predictor.

use jobfit_core::traits::{FitPredictor, ScoringSource};

use crate::error::PredictorError;

pub const DEFAULT_SKILL_WEIGHT: f64 = 0.65;
pub const DEFAULT_TRUST_WEIGHT: f64 = 0.35;

/// Blends skill and trust with fixed weights: `(w_s * skill + w_t * trust)` on 0–100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFitPredictor {
    skill_weight: f64,
    trust_weight: f64,
}

impl LinearFitPredictor {
    /// Create a predictor with custom weights.
    ///
    /// Weights must be finite, non-negative, and sum to 1 so the result stays on 0–100.
    pub fn new(skill_weight: f64, trust_weight: f64) -> Result<Self, PredictorError> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(skill_weight) || !valid(trust_weight) {
            return Err(PredictorError::InvalidWeights(format!(
                "weights must be finite and non-negative, got skill={skill_weight} trust={trust_weight}"
            )));
        }
        if ((skill_weight + trust_weight) - 1.0).abs() > 1e-6 {
            return Err(PredictorError::InvalidWeights(format!(
                "weights must sum to 1, got {}",
                skill_weight + trust_weight
            )));
        }
        Ok(Self {
            skill_weight,
            trust_weight,
        })
    }

    pub fn skill_weight(&self) -> f64 {
        self.skill_weight
    }

    pub fn trust_weight(&self) -> f64 {
        self.trust_weight
    }
}

impl Default for LinearFitPredictor {
    fn default() -> Self {
        Self {
            skill_weight: DEFAULT_SKILL_WEIGHT,
            trust_weight: DEFAULT_TRUST_WEIGHT,
        }
    }
}

impl FitPredictor for LinearFitPredictor {
    fn source(&self) -> ScoringSource {
        ScoringSource::Simulation
    }

    fn job_fit_score(&self, skill_score: f64, trust_score: f64) -> f64 {
        let skill = skill_score / 100.0;
        let trust = trust_score / 100.0;
        (skill * self.skill_weight + trust * self.trust_weight) * 100.0
    }
}
