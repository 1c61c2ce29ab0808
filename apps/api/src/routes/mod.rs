pub mod health;
pub mod scoring;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/applicants/:id/score",
            post(scoring::handle_score_applicant),
        )
        .route(
            "/api/v1/assessments/:id",
            get(scoring::handle_assessment_status),
        )
        .route(
            "/api/v1/assessments/:id/submit",
            post(scoring::handle_submit_assessment),
        )
        .route(
            "/api/v1/jobs/:id/leaderboard",
            get(scoring::handle_leaderboard),
        )
        .with_state(state)
}
