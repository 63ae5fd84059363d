pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::intake::handlers as intake_handlers;
use crate::session::handlers as session_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Intake: parse resume + JD, cache the snapshot
        .route(
            "/api/v1/intake/analyze",
            post(intake_handlers::handle_analyze),
        )
        // Sessions: the interview journey
        .route(
            "/api/v1/sessions",
            post(session_handlers::handle_start_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(session_handlers::handle_get_session),
        )
        .route(
            "/api/v1/sessions/:id/questions/:position/answer",
            post(session_handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/advance",
            post(session_handlers::handle_advance),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            get(session_handlers::handle_summary),
        )
        .route(
            "/api/v1/users/:user_id/sessions",
            get(session_handlers::handle_list_sessions),
        )
        .with_state(state)
}
