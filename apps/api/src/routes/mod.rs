pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::code_runner::handlers as code_runner;
use crate::interview::handlers as interview;
use crate::practice::handlers as practice;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/signup", post(auth::handle_signup))
        .route("/api/login", post(auth::handle_login))
        .route("/api/logout", post(auth::handle_logout))
        .route("/api/check_session", get(auth::handle_check_session))
        .route("/api/save_report", post(auth::handle_save_report))
        // Scripted interviews
        .route(
            "/api/v1/interviews/:variant/turn",
            post(interview::handle_interview_turn),
        )
        .route(
            "/managerial-conversation",
            post(interview::handle_managerial_conversation),
        )
        .route("/hr-conversation", post(interview::handle_hr_conversation))
        .route(
            "/resume-conversation",
            post(interview::handle_resume_conversation),
        )
        // Practice
        .route("/generate-question", post(practice::handle_generate_question))
        .route("/interview", post(practice::handle_interview_feedback))
        .route(
            "/communication-feedback",
            post(practice::handle_communication_feedback),
        )
        .route("/communication-topic", get(practice::handle_communication_topic))
        .route("/aptitude-question", post(practice::handle_aptitude_question))
        .route("/aptitude-feedback", post(practice::handle_aptitude_feedback))
        .route("/technical-question", post(practice::handle_technical_question))
        .route("/generate-final-report", post(practice::handle_final_report))
        .route("/run-code", post(code_runner::handle_run_code))
        .route(
            "/upload-practice-resume",
            post(resume::handle_upload_practice_resume),
        )
        .layer(body_limit)
        .with_state(state)
}
