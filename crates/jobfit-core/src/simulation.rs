//! Simulated candidates.
//!
//! Drives a full engine run where each answer is correct with a probability
//! that rises with the candidate's skill level relative to the question's
//! difficulty. Useful for sanity-checking an item bank end to end.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::bank::ItemBank;
use crate::engine::{AdaptiveEngine, EngineConfig};
use crate::error::AssessmentError;
use crate::model::{Difficulty, QuestionId};

/// Lowest and highest simulated candidate skill levels.
pub const MIN_CANDIDATE_SKILL: u8 = 1;
pub const MAX_CANDIDATE_SKILL: u8 = 5;

/// Probability that a candidate at `skill` answers a `difficulty` question correctly.
pub fn correctness_probability(skill: u8, difficulty: Difficulty) -> f64 {
    let gap = f64::from(skill) - f64::from(difficulty.level());
    (0.25 + 0.15 * gap).clamp(0.0, 1.0)
}

/// One answered question in a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedAnswer {
    pub question_id: QuestionId,
    pub difficulty: Difficulty,
    pub correct: bool,
    pub raw_score: f64,
}

/// Outcome of one simulated assessment.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub role: String,
    pub candidate_skill: u8,
    pub answers: Vec<SimulatedAnswer>,
    pub raw_score: f64,
    pub skill_score: f64,
}

/// Run one assessment for `role` with a simulated candidate.
pub fn simulate(
    bank: Arc<ItemBank>,
    role: &str,
    candidate_skill: u8,
    config: EngineConfig,
    seed: Option<u64>,
) -> Result<SimulationReport, AssessmentError> {
    if !(MIN_CANDIDATE_SKILL..=MAX_CANDIDATE_SKILL).contains(&candidate_skill) {
        return Err(AssessmentError::InvalidRequest(format!(
            "candidate skill must be within [{MIN_CANDIDATE_SKILL}, {MAX_CANDIDATE_SKILL}], got {candidate_skill}"
        )));
    }

    let (mut engine, mut rng) = match seed {
        Some(seed) => (
            AdaptiveEngine::with_seed(bank, config, seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (AdaptiveEngine::new(bank, config), StdRng::from_entropy()),
    };

    let mut current = engine
        .start(role)?
        .ok_or_else(|| AssessmentError::NoQuestionsForRole(role.to_string()))?;
    let mut answers = Vec::new();
    let mut raw_score = 0.0;

    loop {
        let correct = rng.gen_bool(correctness_probability(candidate_skill, current.difficulty));
        let (next, new_raw) = engine.submit(current.id, correct, raw_score)?;
        raw_score = new_raw;
        answers.push(SimulatedAnswer {
            question_id: current.id,
            difficulty: current.difficulty,
            correct,
            raw_score,
        });
        match next {
            Some(q) => current = q,
            None => break,
        }
    }

    Ok(SimulationReport {
        role: role.to_string(),
        candidate_skill,
        answers,
        raw_score,
        skill_score: engine.final_skill_score(raw_score),
    })
}
