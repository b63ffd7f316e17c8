//! Core data model types for jobfit.
//!
//! These are the fundamental types the whole system uses to represent
//! questions, their identifiers, and their difficulty tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a question across the whole item bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        QuestionId(id)
    }
}

/// A difficulty tier, always within `[Difficulty::MIN, Difficulty::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(3);
    /// Starting tier for every assessment: two steps above the easiest.
    pub const INITIAL: Difficulty = Difficulty(Self::MIN.0 + 2);

    /// Build a difficulty, rejecting values outside the supported range.
    pub fn new(level: i64) -> Option<Self> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&level) {
            Some(Difficulty(level as u8))
        } else {
            None
        }
    }

    /// The numeric tier.
    pub fn level(self) -> u8 {
        self.0
    }

    /// One tier harder, saturating at `MAX`.
    pub fn harder(self) -> Self {
        Difficulty(self.0.saturating_add(1).min(Self::MAX.0))
    }

    /// One tier easier, saturating at `MIN`.
    pub fn easier(self) -> Self {
        Difficulty(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    /// Move one tier in the direction of the answer's correctness.
    pub fn adjust(self, correct: bool) -> Self {
        if correct {
            self.harder()
        } else {
            self.easier()
        }
    }

    /// The search window around this tier: `{d-1, d, d+1}` clamped and deduplicated.
    pub fn window(self) -> Vec<Difficulty> {
        let mut tiers = vec![self.easier(), self, self.harder()];
        tiers.dedup();
        tiers
    }

    /// Every supported tier, easiest first.
    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN.0..=Self::MAX.0).map(Difficulty)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = String;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Difficulty::new(level).ok_or_else(|| {
            format!(
                "difficulty {level} outside [{}, {}]",
                Difficulty::MIN,
                Difficulty::MAX
            )
        })
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// A single multiple-choice question from the item bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: QuestionId,
    /// Job role this question assesses.
    pub role: String,
    /// The question text shown to the candidate.
    pub text: String,
    /// Answer choices in display order.
    pub options: Vec<String>,
    /// The correct choice; always one of `options`.
    pub correct_answer: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
}

impl Question {
    /// Grade a submitted choice against the correct answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_answer
    }
}
