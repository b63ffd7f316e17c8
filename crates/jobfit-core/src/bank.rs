//! Immutable, indexed question bank.
//!
//! The bank is built once from validated questions and never mutated. An index
//! `role -> difficulty -> [question id]` built at construction keeps selection
//! to a map lookup plus a filter over the candidate ids.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::AssessmentError;
use crate::model::{Difficulty, Question, QuestionId};

/// Read-only collection of questions grouped by role and difficulty.
#[derive(Debug, Default)]
pub struct ItemBank {
    questions: HashMap<QuestionId, Arc<Question>>,
    index: HashMap<String, HashMap<Difficulty, Vec<QuestionId>>>,
    roles: Vec<String>,
}

impl ItemBank {
    /// Build a bank from already-validated questions.
    ///
    /// Fails if two questions share an id or a question's correct answer is
    /// not among its options.
    pub fn new(questions: impl IntoIterator<Item = Question>) -> Result<Self, AssessmentError> {
        let mut bank = ItemBank::default();

        for question in questions {
            if !question.options.contains(&question.correct_answer) {
                return Err(AssessmentError::DataUnavailable(format!(
                    "question {}: answer '{}' is not one of its options",
                    question.id, question.correct_answer
                )));
            }
            if bank.questions.contains_key(&question.id) {
                return Err(AssessmentError::DataUnavailable(format!(
                    "duplicate question id: {}",
                    question.id
                )));
            }

            if !bank.index.contains_key(&question.role) {
                bank.roles.push(question.role.clone());
            }
            bank.index
                .entry(question.role.clone())
                .or_default()
                .entry(question.difficulty)
                .or_default()
                .push(question.id);
            bank.questions.insert(question.id, Arc::new(question));
        }

        Ok(bank)
    }

    /// Every question for `role` whose difficulty is in `difficulties` and whose
    /// id is not in `excluded`. Empty when nothing matches.
    pub fn query(
        &self,
        role: &str,
        difficulties: &[Difficulty],
        excluded: &HashSet<QuestionId>,
    ) -> Vec<Arc<Question>> {
        let Some(by_difficulty) = self.index.get(role) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        difficulties
            .iter()
            .filter(|d| seen.insert(**d))
            .filter_map(|d| by_difficulty.get(d))
            .flatten()
            .filter(|id| !excluded.contains(id))
            .filter_map(|id| self.questions.get(id).cloned())
            .collect()
    }

    /// Every question for `role` at any difficulty, minus `excluded`.
    pub fn query_any(&self, role: &str, excluded: &HashSet<QuestionId>) -> Vec<Arc<Question>> {
        let all: Vec<Difficulty> = Difficulty::all().collect();
        self.query(role, &all, excluded)
    }

    /// Look up a question by id.
    pub fn get(&self, id: QuestionId) -> Option<&Arc<Question>> {
        self.questions.get(&id)
    }

    /// Roles in the order they first appear in the dataset.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Whether the bank holds at least one question for `role`.
    pub fn contains_role(&self, role: &str) -> bool {
        self.index.contains_key(role)
    }

    /// Number of questions for `role`.
    pub fn count_for_role(&self, role: &str) -> usize {
        self.index
            .get(role)
            .map(|by_difficulty| by_difficulty.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Total number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A question with two options where "right" is correct.
    pub fn question(id: u64, role: &str, difficulty: i64) -> Question {
        Question {
            id: QuestionId(id),
            role: role.to_string(),
            text: format!("{role} question {id}"),
            options: vec!["right".into(), "wrong".into()],
            correct_answer: "right".into(),
            difficulty: Difficulty::new(difficulty).unwrap(),
        }
    }

    /// `per_tier` questions at every difficulty for each role, ids sequential.
    pub fn bank(roles: &[&str], per_tier: u64) -> ItemBank {
        let mut questions = Vec::new();
        let mut next_id = 0;
        for role in roles {
            for d in 1..=3 {
                for _ in 0..per_tier {
                    questions.push(question(next_id, role, d));
                    next_id += 1;
                }
            }
        }
        ItemBank::new(questions).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{bank, question};
    use super::*;

    fn ids(found: &[Arc<Question>]) -> Vec<u64> {
        let mut ids: Vec<u64> = found.iter().map(|q| q.id.0).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn query_filters_role_difficulty_and_exclusions() {
        let bank = bank(&["Backend", "Frontend"], 2);
        let tier2 = [Difficulty::new(2).unwrap()];

        assert_eq!(ids(&bank.query("Backend", &tier2, &HashSet::new())), vec![2, 3]);
        assert_eq!(ids(&bank.query("Frontend", &tier2, &HashSet::new())), vec![8, 9]);

        let excluded = HashSet::from([QuestionId(2)]);
        assert_eq!(ids(&bank.query("Backend", &tier2, &excluded)), vec![3]);
    }

    #[test]
    fn query_unknown_role_is_empty() {
        let bank = bank(&["Backend"], 1);
        assert!(bank.query_any("Designer", &HashSet::new()).is_empty());
        assert!(!bank.contains_role("Designer"));
        assert_eq!(bank.count_for_role("Designer"), 0);
    }

    #[test]
    fn query_ignores_repeated_difficulties() {
        let bank = bank(&["Backend"], 1);
        let d = Difficulty::MIN;
        assert_eq!(bank.query("Backend", &[d, d, d], &HashSet::new()).len(), 1);
    }

    #[test]
    fn query_any_spans_all_tiers() {
        let bank = bank(&["Backend"], 2);
        assert_eq!(bank.query_any("Backend", &HashSet::new()).len(), 6);
        let excluded: HashSet<QuestionId> = (0..5).map(QuestionId).collect();
        assert_eq!(ids(&bank.query_any("Backend", &excluded)), vec![5]);
    }

    #[test]
    fn roles_keep_first_seen_order() {
        let bank = ItemBank::new(vec![
            question(0, "Zeta", 1),
            question(1, "Alpha", 1),
            question(2, "Zeta", 2),
        ])
        .unwrap();
        assert_eq!(bank.roles(), &["Zeta".to_string(), "Alpha".to_string()]);
        assert_eq!(bank.count_for_role("Zeta"), 2);
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ItemBank::new(vec![question(1, "A", 1), question(1, "B", 2)]).unwrap_err();
        assert!(err.to_string().contains("duplicate question id: 1"));
    }

    #[test]
    fn rejects_answer_outside_options() {
        let mut q = question(1, "A", 1);
        q.correct_answer = "maybe".into();
        let err = ItemBank::new(vec![q]).unwrap_err();
        assert!(matches!(err, AssessmentError::DataUnavailable(_)));
    }
}
