//! Axum route handlers for the session API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::answer_evaluator::Evaluation;
use crate::models::session::SessionRow;
use crate::session::orchestrator::{
    advance, start_session, submit_answer, summary, AdvanceOutcome, SessionDetail, SessionSummary,
};
use crate::session::store;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

/// POST /api/v1/sessions
///
/// Starts a session from the cached intake snapshot: skill-gap computation,
/// one question-generation call, atomic persistence of the question batch.
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<SessionDetail>, AppError> {
    let detail = start_session(
        &state.db,
        &state.redis,
        state.llm.as_ref(),
        request.user_id,
    )
    .await?;
    Ok(Json(detail))
}

/// GET /api/v1/sessions/:id
///
/// Returns the session and its ordered question sequence.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetail>, AppError> {
    let session = store::fetch_session(&state.db, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    let questions = store::fetch_questions(&state.db, session_id).await?;
    Ok(Json(SessionDetail { session, questions }))
}

/// POST /api/v1/sessions/:id/questions/:position/answer
///
/// Evaluates one submitted answer. Resubmission after feedback exists
/// returns the stored evaluation unchanged.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path((session_id, position)): Path<(Uuid, i32)>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<Evaluation>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let evaluation = submit_answer(
        &state.db,
        state.llm.as_ref(),
        session_id,
        position,
        request.answer,
    )
    .await?;
    Ok(Json(evaluation))
}

/// POST /api/v1/sessions/:id/advance
///
/// Moves to the next question, or completes the session after the last one.
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AdvanceOutcome>, AppError> {
    let outcome = advance(&state.db, session_id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/sessions/:id/summary
///
/// The completed session's readiness score and per-skill breakdown.
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let session_summary = summary(&state.db, session_id).await?;
    Ok(Json(session_summary))
}

/// GET /api/v1/users/:user_id/sessions
///
/// A user's session history, newest first.
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SessionRow>>, AppError> {
    let sessions = store::list_sessions(&state.db, user_id).await?;
    Ok(Json(sessions))
}
