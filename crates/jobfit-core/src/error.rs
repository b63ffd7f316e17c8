//! Assessment error types.
//!
//! These error types represent every failure the core can surface to a caller.
//! Defined in `jobfit-core` so the server can classify them into response
//! statuses without string matching.

use thiserror::Error;

use crate::model::QuestionId;

/// Errors that can occur while loading the item bank or driving an assessment.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The dataset is missing, empty, or unparseable.
    #[error("assessment data unavailable: {0}")]
    DataUnavailable(String),

    /// A request field is missing or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The session id is unknown, expired, or already completed.
    #[error("invalid or expired session_id: {0}")]
    UnknownSession(String),

    /// The bank has no question for the requested role.
    #[error("no questions available for role: {0}")]
    NoQuestionsForRole(String),

    /// The submitted question is not the one currently outstanding.
    #[error("question {got} is not the outstanding question (expected {expected})")]
    QuestionMismatch {
        expected: QuestionId,
        got: QuestionId,
    },

    /// The engine is not accepting answers in its current state.
    #[error("assessment is not in progress")]
    NotInProgress,

    /// An unexpected failure inside selection or scoring.
    #[error("engine internal error: {0}")]
    EngineInternal(String),
}

impl AssessmentError {
    /// Returns `true` if the caller caused this error and state was left untouched.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AssessmentError::InvalidRequest(_)
                | AssessmentError::UnknownSession(_)
                | AssessmentError::NoQuestionsForRole(_)
                | AssessmentError::QuestionMismatch { .. }
                | AssessmentError::NotInProgress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(AssessmentError::UnknownSession("x".into()).is_client_error());
        assert!(AssessmentError::QuestionMismatch {
            expected: QuestionId(1),
            got: QuestionId(2)
        }
        .is_client_error());
        assert!(!AssessmentError::EngineInternal("boom".into()).is_client_error());
        assert!(!AssessmentError::DataUnavailable("gone".into()).is_client_error());
    }

    #[test]
    fn mismatch_message_names_both_ids() {
        let err = AssessmentError::QuestionMismatch {
            expected: QuestionId(7),
            got: QuestionId(3),
        };
        assert_eq!(
            err.to_string(),
            "question 3 is not the outstanding question (expected 7)"
        );
    }
}
