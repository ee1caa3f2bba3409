pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::report::handlers as report;
use crate::state::AppState;
use crate::submissions::handlers as submissions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Questionnaire
        .route(
            "/api/v1/questions",
            get(submissions::handle_list_questions).post(submissions::handle_create_questions),
        )
        .route("/api/v1/submissions", post(submissions::handle_submit))
        // Reports
        .route(
            "/api/v1/reports/generate",
            post(report::handle_generate_report),
        )
        .route("/api/v1/reports/:test_id", get(report::handle_get_report))
        .with_state(state)
}
