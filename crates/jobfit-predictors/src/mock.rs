//! Mock predictor for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use jobfit_core::traits::{FitPredictor, ScoringSource};

/// A fit predictor that returns a fixed score and records its inputs.
pub struct MockPredictor {
    score: f64,
    source: ScoringSource,
    call_count: AtomicU32,
    last_inputs: Mutex<Option<(f64, f64)>>,
}

impl MockPredictor {
    /// Create a mock that always returns `score`, tagged as a trained model.
    pub fn with_fixed_score(score: f64) -> Self {
        Self {
            score,
            source: ScoringSource::TrainedModel,
            call_count: AtomicU32::new(0),
            last_inputs: Mutex::new(None),
        }
    }

    /// Override the reported source.
    pub fn with_source(mut self, source: ScoringSource) -> Self {
        self.source = source;
        self
    }

    /// Number of predictions made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// `(skill_score, trust_score)` of the last prediction.
    pub fn last_inputs(&self) -> Option<(f64, f64)> {
        self.last_inputs.lock().ok().and_then(|inputs| *inputs)
    }
}

impl FitPredictor for MockPredictor {
    fn source(&self) -> ScoringSource {
        self.source
    }

    fn job_fit_score(&self, skill_score: f64, trust_score: f64) -> f64 {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut inputs) = self.last_inputs.lock() {
            *inputs = Some((skill_score, trust_score));
        }
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfit_core::traits::FitCategory;

    #[test]
    fn returns_fixed_score_and_records_inputs() {
        let mock = MockPredictor::with_fixed_score(70.0);
        let prediction = mock.predict(55.5, 90.0);
        assert_eq!(prediction.job_fit_score, 70.0);
        assert_eq!(prediction.category, FitCategory::High);
        assert_eq!(prediction.category_label(), "High Fit (Trained Model)");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_inputs(), Some((55.5, 90.0)));
    }

    #[test]
    fn source_can_be_overridden() {
        let mock = MockPredictor::with_fixed_score(10.0).with_source(ScoringSource::Simulation);
        assert_eq!(mock.predict(0.0, 0.0).category_label(), "Low Fit (Simulation)");
    }
}
