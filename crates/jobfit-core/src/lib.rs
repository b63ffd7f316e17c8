//! jobfit-core - Item bank, adaptive engine, scoring and sessions.
//!
//! This crate defines the question model, the adaptive item-selection state
//! machine, the raw-to-skill score transform, and the concurrency-safe session
//! store that the rest of jobfit builds on.

pub mod bank;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod simulation;
pub mod store;
pub mod traits;

pub use bank::ItemBank;
pub use engine::{AdaptiveEngine, EngineConfig, EngineState};
pub use error::AssessmentError;
pub use model::{Difficulty, Question, QuestionId};
pub use store::{SessionId, SessionStore, SessionStoreConfig};
pub use traits::{FitCategory, FitPrediction, FitPredictor, ScoringSource};
