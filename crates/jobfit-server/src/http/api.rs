//! REST API handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use jobfit_core::scoring::round2;
use jobfit_core::store::SubmitOutcome;
use jobfit_core::{AssessmentError, Question, QuestionId, SessionId};

use crate::error::ApiError;
use crate::AppState;

/// Message attached to every completed assessment.
pub const COMPLETION_MESSAGE: &str = "Assessment completed successfully.";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
    /// Questions in the loaded item bank
    pub questions: usize,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        active_sessions: state.store.len(),
        questions: state.bank.len(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

/// GET /roles
pub async fn roles(State(state): State<Arc<AppState>>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.bank.roles().to_vec(),
    })
}

/// A question as shown to the candidate. The correct answer is never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPayload {
    #[serde(rename = "Q_ID")]
    pub q_id: u64,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Options")]
    pub options: Vec<String>,
    #[serde(rename = "Difficulty")]
    pub difficulty: u8,
}

impl From<&Question> for QuestionPayload {
    fn from(q: &Question) -> Self {
        Self {
            q_id: q.id.0,
            question: q.text.clone(),
            options: q.options.clone(),
            difficulty: q.difficulty.level(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartRequest {
    pub role: Option<String>,
    pub trust_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartResponse {
    pub session_id: String,
    pub question: QuestionPayload,
}

/// POST /start_assessment
pub async fn start_assessment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, ApiError> {
    let Json(request) = payload?;
    let role = request
        .role
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AssessmentError::InvalidRequest("role is required".into()))?;

    let started = state.store.create(role.trim(), request.trust_score)?;
    Ok(Json(StartResponse {
        session_id: started.session_id.to_string(),
        question: QuestionPayload::from(started.question.as_ref()),
    }))
}

/// Either `answer` (graded here) or `is_correct` (trusted) must be present.
/// When both are sent, `answer` wins.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub session_id: String,
    pub q_id: u64,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    InProgress {
        new_raw_score: f64,
        questions_asked: u32,
        question: QuestionPayload,
    },
    Complete {
        #[serde(rename = "JobFitScore")]
        job_fit_score: f64,
        #[serde(rename = "SkillScore")]
        skill_score: f64,
        #[serde(rename = "TrustScore")]
        trust_score: f64,
        #[serde(rename = "Category")]
        category: String,
        message: String,
    },
}

/// POST /submit_answer
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(request) = payload?;
    let session_id: SessionId = request.session_id.parse()?;
    let question_id = QuestionId(request.q_id);

    let was_correct = match (&request.answer, request.is_correct) {
        (Some(answer), _) => state
            .bank
            .get(question_id)
            .is_some_and(|q| q.is_correct(answer)),
        (None, Some(is_correct)) => is_correct,
        (None, None) => {
            return Err(AssessmentError::InvalidRequest(
                "either is_correct or answer is required".into(),
            )
            .into())
        }
    };

    let response = match state.store.submit(&session_id, question_id, was_correct)? {
        SubmitOutcome::Next {
            question,
            raw_score,
            questions_asked,
        } => SubmitResponse::InProgress {
            new_raw_score: round2(raw_score),
            questions_asked,
            question: QuestionPayload::from(question.as_ref()),
        },
        SubmitOutcome::Complete(result) => SubmitResponse::Complete {
            job_fit_score: result.prediction.job_fit_score,
            skill_score: result.prediction.skill_score,
            trust_score: result.prediction.trust_score,
            category: result.prediction.category_label(),
            message: COMPLETION_MESSAGE.to_string(),
        },
    };
    Ok(Json(response))
}

/// Progress of a live session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionProgress {
    pub role: String,
    pub questions_asked: u32,
    pub questions_administered: usize,
    pub raw_score: f64,
    /// Difficulty the next answer will move from.
    pub current_difficulty: u8,
}

/// GET /sessions/:session_id
pub async fn session_progress(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionProgress>, ApiError> {
    let id: SessionId = session_id.parse()?;
    let snapshot = state
        .store
        .snapshot(&id)
        .ok_or(AssessmentError::UnknownSession(session_id))?;
    Ok(Json(SessionProgress {
        role: snapshot.role,
        questions_asked: snapshot.questions_asked,
        questions_administered: snapshot.administered,
        raw_score: round2(snapshot.raw_score),
        current_difficulty: snapshot.current_difficulty.level(),
    }))
}

/// DELETE /sessions/:session_id
pub async fn abandon_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: SessionId = session_id.parse()?;
    if state.store.evict(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AssessmentError::UnknownSession(session_id).into())
    }
}
