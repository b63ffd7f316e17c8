//! HTTP server module

mod api;

use std::any::Any;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use jobfit_core::AssessmentError;

use crate::{ApiError, AppState};

pub use api::{
    HealthResponse, QuestionPayload, RolesResponse, SessionProgress, StartRequest, StartResponse,
    SubmitRequest, SubmitResponse, COMPLETION_MESSAGE,
};

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/roles", get(api::roles))
        .route("/start_assessment", post(api::start_assessment))
        .route("/submit_answer", post(api::submit_answer))
        .route(
            "/sessions/:session_id",
            get(api::session_progress).delete(api::abandon_session),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Turn a panicking handler or predictor into the generic 500 body.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("request handler panicked: {detail}");
    ApiError::from(AssessmentError::EngineInternal(
        "request handler panicked".to_string(),
    ))
    .into_response()
}
