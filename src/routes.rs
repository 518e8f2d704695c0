// src/routes.rs

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin, quiz, report},
    state::AppState,
    utils::session::admin_middleware,
};

/// Assembles the main application router.
///
/// * Participant flow: register, verify, quiz, submit.
/// * Admin console under `/admin`, everything but the login page behind `admin_middleware`.
/// * Static assets under `/static`.
pub fn create_router(state: AppState) -> Router {
    let quiz_routes = Router::new()
        .route("/", get(quiz::register_page).post(quiz::register))
        .route("/verify", get(quiz::verify_page).post(quiz::verify))
        .route("/quiz", get(quiz::quiz_page))
        .route("/submit", post(quiz::submit));

    let admin_routes = Router::new()
        .route("/logout", get(admin::logout))
        .route("/toggle", get(admin::toggle_quiz))
        .route("/timer", get(admin::timer_page).post(admin::set_timer))
        .route(
            "/questions",
            get(admin::questions_page).post(admin::create_question),
        )
        .route("/questions/{id}/delete", post(admin::delete_question))
        .route("/leaderboard", get(report::leaderboard))
        .route("/participants/{id}", get(report::participant_detail))
        .route("/graph", get(report::graph))
        .route("/export", get(report::export))
        .route(
            "/clear",
            get(admin::clear_confirm).post(admin::clear_leaderboard),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    Router::new()
        .merge(quiz_routes)
        .route("/admin", get(admin::console).post(admin::login))
        .nest("/admin", admin_routes)
        .nest_service("/static", ServeDir::new("static"))
        // Global Middleware (applied from outside in)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
