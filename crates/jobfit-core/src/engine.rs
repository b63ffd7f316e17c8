//! Adaptive item-selection state machine.
//!
//! One engine drives one assessment for one role: it picks questions near the
//! current target difficulty, moves the target up on a correct answer and down
//! on a wrong one, and accumulates the raw score.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bank::ItemBank;
use crate::error::AssessmentError;
use crate::model::{Difficulty, Question, QuestionId};
use crate::scoring::{final_skill_score, points_for};

/// Configuration for the adaptive engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of answers after which the assessment completes.
    pub max_questions: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_questions: 10 }
    }
}

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    /// Waiting for the answer to `outstanding`.
    InProgress { outstanding: QuestionId },
    Completed,
}

/// Per-assessment adaptive engine.
pub struct AdaptiveEngine {
    bank: Arc<ItemBank>,
    config: EngineConfig,
    role: String,
    state: EngineState,
    administered: HashSet<QuestionId>,
    current_difficulty: Difficulty,
    questions_asked: u32,
    rng: StdRng,
}

impl AdaptiveEngine {
    /// Create an engine drawing randomness from OS entropy.
    pub fn new(bank: Arc<ItemBank>, config: EngineConfig) -> Self {
        Self::with_rng(bank, config, StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed, for reproducible runs.
    pub fn with_seed(bank: Arc<ItemBank>, config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(bank, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bank: Arc<ItemBank>, config: EngineConfig, rng: StdRng) -> Self {
        Self {
            bank,
            config,
            role: String::new(),
            state: EngineState::NotStarted,
            administered: HashSet::new(),
            current_difficulty: Difficulty::INITIAL,
            questions_asked: 0,
            rng,
        }
    }

    /// Bind the engine to `role` and select the first question.
    ///
    /// Returns `Ok(None)` when the bank has nothing for the role; the engine is
    /// then `Completed` and the assessment cannot start.
    pub fn start(&mut self, role: &str) -> Result<Option<Arc<Question>>, AssessmentError> {
        if self.state != EngineState::NotStarted {
            return Err(AssessmentError::InvalidRequest(
                "assessment already started; create a new engine".into(),
            ));
        }
        if role.trim().is_empty() {
            return Err(AssessmentError::InvalidRequest("role is required".into()));
        }

        self.role = role.to_string();
        self.administered.clear();
        self.questions_asked = 0;
        self.current_difficulty = Difficulty::INITIAL;

        let first = self.select_next();
        self.state = match &first {
            Some(q) => EngineState::InProgress { outstanding: q.id },
            None => {
                tracing::debug!("no starting question for role '{role}'");
                EngineState::Completed
            }
        };
        Ok(first)
    }

    /// Record the answer to the outstanding question and select the next one.
    ///
    /// Returns the next question (or `None` when the assessment is complete)
    /// and the updated raw score. On error nothing is mutated.
    pub fn submit(
        &mut self,
        question_id: QuestionId,
        was_correct: bool,
        current_raw_score: f64,
    ) -> Result<(Option<Arc<Question>>, f64), AssessmentError> {
        let EngineState::InProgress { outstanding } = self.state else {
            return Err(AssessmentError::NotInProgress);
        };
        if question_id != outstanding {
            return Err(AssessmentError::QuestionMismatch {
                expected: outstanding,
                got: question_id,
            });
        }
        if !current_raw_score.is_finite() || current_raw_score < 0.0 {
            return Err(AssessmentError::InvalidRequest(format!(
                "raw score must be a non-negative number, got {current_raw_score}"
            )));
        }
        // Score with the answered question's own tier, not the target tier.
        let answered_difficulty = self
            .bank
            .get(question_id)
            .map(|q| q.difficulty)
            .ok_or_else(|| {
                AssessmentError::EngineInternal(format!(
                    "question {question_id} missing from item bank"
                ))
            })?;

        self.administered.insert(question_id);
        self.questions_asked += 1;
        let new_raw_score = current_raw_score + points_for(answered_difficulty, was_correct);

        if self.questions_asked >= self.config.max_questions {
            self.state = EngineState::Completed;
            return Ok((None, new_raw_score));
        }

        self.current_difficulty = self.current_difficulty.adjust(was_correct);

        let next = self.select_next();
        self.state = match &next {
            Some(q) => EngineState::InProgress { outstanding: q.id },
            None => {
                tracing::debug!(
                    "item bank exhausted for role '{}' after {} questions",
                    self.role,
                    self.questions_asked
                );
                EngineState::Completed
            }
        };
        Ok((next, new_raw_score))
    }

    /// Skill score for a raw score under this engine's question cap.
    pub fn final_skill_score(&self, raw_score: f64) -> f64 {
        final_skill_score(raw_score, self.config.max_questions)
    }

    /// Window search around the target tier, then any remaining question for the role.
    fn select_next(&mut self) -> Option<Arc<Question>> {
        let window = self.current_difficulty.window();
        let mut candidates = self.bank.query(&self.role, &window, &self.administered);
        if candidates.is_empty() {
            candidates = self.bank.query_any(&self.role, &self.administered);
        }
        candidates.choose(&mut self.rng).cloned()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == EngineState::Completed
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Ids answered so far.
    pub fn administered(&self) -> &HashSet<QuestionId> {
        &self.administered
    }

    pub fn current_difficulty(&self) -> Difficulty {
        self.current_difficulty
    }

    pub fn questions_asked(&self) -> u32 {
        self.questions_asked
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
