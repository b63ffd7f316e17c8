//! Raw-score accounting and the raw-to-skill score transform.
//!
//! The skill score is a logarithmic compression of the raw score onto 0–100,
//! with a floor so that any correct answer yields a visible score.

use crate::model::Difficulty;

/// Points earned per difficulty tier for a correct answer.
pub const POINTS_PER_TIER: f64 = 2.0;

/// Lowest skill score reported once at least one point has been earned.
pub const SKILL_SCORE_FLOOR: f64 = 5.0;

/// Points earned for one answer at the given difficulty.
pub fn points_for(difficulty: Difficulty, correct: bool) -> f64 {
    if correct {
        POINTS_PER_TIER * f64::from(difficulty.level())
    } else {
        0.0
    }
}

/// Highest raw score an assessment of `max_questions` can reach.
pub fn max_possible_raw_score(max_questions: u32) -> f64 {
    f64::from(max_questions) * POINTS_PER_TIER * f64::from(Difficulty::MAX.level())
}

/// Map a raw score onto a 0–100 skill score.
///
/// `ln(raw + 1) / ln(max + 1) * 100`, clamped to `[0, 100]`, floored at
/// [`SKILL_SCORE_FLOOR`] when `raw > 0`, rounded to two decimals.
pub fn final_skill_score(raw_score: f64, max_questions: u32) -> f64 {
    let max_possible = max_possible_raw_score(max_questions);
    let raw = raw_score.max(0.0);

    let mut skill = if max_possible > 0.0 {
        ((raw + 1.0).ln() / (max_possible + 1.0).ln() * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    if raw > 0.0 && skill < SKILL_SCORE_FLOOR {
        skill = SKILL_SCORE_FLOOR;
    }

    round2(skill)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
