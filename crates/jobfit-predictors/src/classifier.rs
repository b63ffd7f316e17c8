//! Trained-classifier predictor.
//!
//! A classifier maps the feature vector `[skill_score, trust_score]` to the
//! probability that the candidate is a fit. The bundled implementation is a
//! logistic model whose parameters are read from a JSON artifact:
//!
//! ```json
//! { "intercept": -7.5, "weights": [0.06, 0.04] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use jobfit_core::traits::{FitPredictor, ScoringSource};

use crate::error::PredictorError;

/// Probability-of-fit model over `[skill_score, trust_score]`.
pub trait Classifier: Send + Sync {
    /// Probability of the positive class, in `[0, 1]`.
    fn probability_of_fit(&self, features: [f64; 2]) -> f64;
}

/// Logistic regression over the two features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub intercept: f64,
    pub weights: [f64; 2],
}

impl LogisticClassifier {
    pub fn new(intercept: f64, weights: [f64; 2]) -> Result<Self, PredictorError> {
        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(PredictorError::InvalidModel(
                "intercept and weights must be finite".into(),
            ));
        }
        Ok(Self { intercept, weights })
    }

    /// Load a classifier artifact from disk.
    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        let content = std::fs::read_to_string(path).map_err(|source| PredictorError::ArtifactIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            PredictorError::ArtifactParse { message, .. } => PredictorError::ArtifactParse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a classifier artifact (useful for testing).
    pub fn from_json_str(content: &str) -> Result<Self, PredictorError> {
        let parsed: LogisticClassifier =
            serde_json::from_str(content).map_err(|e| PredictorError::ArtifactParse {
                path: "<inline>".into(),
                message: e.to_string(),
            })?;
        Self::new(parsed.intercept, parsed.weights)
    }
}

impl Classifier for LogisticClassifier {
    fn probability_of_fit(&self, features: [f64; 2]) -> f64 {
        let z = self.intercept + self.weights[0] * features[0] + self.weights[1] * features[1];
        1.0 / (1.0 + (-z).exp())
    }
}

/// Predictor backed by a trained classifier.
pub struct ClassifierFitPredictor {
    classifier: Box<dyn Classifier>,
}

impl ClassifierFitPredictor {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

impl FitPredictor for ClassifierFitPredictor {
    fn source(&self) -> ScoringSource {
        ScoringSource::TrainedModel
    }

    fn job_fit_score(&self, skill_score: f64, trust_score: f64) -> f64 {
        self.classifier
            .probability_of_fit([skill_score, trust_score])
            .clamp(0.0, 1.0)
            * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfit_core::traits::FitCategory;

    const ARTIFACT: &str = r#"{ "intercept": -7.5, "weights": [0.06, 0.04] }"#;

    struct Always(f64);

    impl Classifier for Always {
        fn probability_of_fit(&self, _: [f64; 2]) -> f64 {
            self.0
        }
    }

    #[test]
    fn probability_is_scaled_to_percent() {
        let predictor = ClassifierFitPredictor::new(Box::new(Always(0.8123)));
        let prediction = predictor.predict(70.0, 85.0);
        assert_eq!(prediction.job_fit_score, 81.23);
        assert_eq!(prediction.category_label(), "Excellent Fit (Trained Model)");
    }

    #[test]
    fn logistic_midpoint_is_one_half() {
        let model = LogisticClassifier::new(-5.0, [0.05, 0.0]).unwrap();
        assert!((model.probability_of_fit([100.0, 0.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn logistic_is_monotone_in_skill() {
        let model = LogisticClassifier::from_json_str(ARTIFACT).unwrap();
        let low = model.probability_of_fit([20.0, 85.0]);
        let high = model.probability_of_fit([90.0, 85.0]);
        assert!(high > low);
        let predictor = ClassifierFitPredictor::new(Box::new(model));
        assert_eq!(predictor.predict(100.0, 100.0).category, FitCategory::Excellent);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job_fit_classifier.json");
        std::fs::write(&path, ARTIFACT).unwrap();
        let model = LogisticClassifier::load(&path).unwrap();
        assert_eq!(model.weights, [0.06, 0.04]);
    }

    #[test]
    fn load_missing_file() {
        let err = LogisticClassifier::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactIo { .. }));
    }

    #[test]
    fn load_corrupt_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"\x80\x04pickle").unwrap();
        let err = LogisticClassifier::load(&path).unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactIo { .. } | PredictorError::ArtifactParse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn rejects_non_finite_parameters() {
        assert!(LogisticClassifier::new(f64::INFINITY, [0.0, 0.0]).is_err());
        assert!(LogisticClassifier::from_json_str(r#"{ "intercept": 1.0 }"#).is_err());
    }
}
