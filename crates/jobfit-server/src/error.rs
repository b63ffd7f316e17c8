//! Server error types

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jobfit_core::AssessmentError;

/// Errors that stop the server itself.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// A request-level failure, rendered as `{ error, code }` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    /// Body could not be read as the expected JSON.
    #[error("invalid JSON in request body: {0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Assessment(e) => match e {
                AssessmentError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                AssessmentError::UnknownSession(_) | AssessmentError::NoQuestionsForRole(_) => {
                    StatusCode::NOT_FOUND
                }
                AssessmentError::QuestionMismatch { .. } | AssessmentError::NotInProgress => {
                    StatusCode::CONFLICT
                }
                AssessmentError::DataUnavailable(_) | AssessmentError::EngineInternal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MalformedBody(_) => "MALFORMED_BODY",
            ApiError::Assessment(e) => match e {
                AssessmentError::InvalidRequest(_) => "INVALID_REQUEST",
                AssessmentError::UnknownSession(_) => "UNKNOWN_SESSION",
                AssessmentError::NoQuestionsForRole(_) => "NO_QUESTIONS",
                AssessmentError::QuestionMismatch { .. } => "QUESTION_MISMATCH",
                AssessmentError::NotInProgress => "NOT_IN_PROGRESS",
                AssessmentError::DataUnavailable(_) => "DATA_UNAVAILABLE",
                AssessmentError::EngineInternal(_) => "INTERNAL_ERROR",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code: self.code().to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfit_core::QuestionId;

    #[test]
    fn status_mapping() {
        let status = |e: AssessmentError| ApiError::from(e).status();
        assert_eq!(status(AssessmentError::InvalidRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(AssessmentError::UnknownSession("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(AssessmentError::NoQuestionsForRole("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AssessmentError::QuestionMismatch {
                expected: QuestionId(1),
                got: QuestionId(2)
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(AssessmentError::NotInProgress), StatusCode::CONFLICT);
        assert_eq!(
            status(AssessmentError::EngineInternal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MalformedBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn message_is_the_inner_error() {
        let err = ApiError::from(AssessmentError::UnknownSession("abc".into()));
        assert_eq!(err.to_string(), "invalid or expired session_id: abc");
        assert_eq!(err.code(), "UNKNOWN_SESSION");
    }
}
