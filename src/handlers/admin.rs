// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, first_validation_message},
    models::{
        question::{CreateQuestionRequest, Question},
        settings::{SetTimerRequest, Settings},
    },
    utils::{hash::Authenticator, html::clean_html, session::Session},
    views::{self, NoticeKind, admin as admin_views},
};

/// Admin login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

async fn list_questions(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, content, option_a, option_b, option_c, option_d, correct
        FROM questions
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Re-renders the timer form with an inline error.
async fn timer_error(pool: &SqlitePool, config: &Config, message: &str) -> Result<Response, AppError> {
    let settings = Settings::load(pool).await?;
    let body = admin_views::timer_form(settings.timer_seconds, Some(message));
    Ok(views::page(&config.event_title, body, true).into_response())
}

/// Re-renders the question page with an inline error.
async fn question_error(pool: &SqlitePool, config: &Config, message: &str) -> Result<Response, AppError> {
    let questions = list_questions(pool).await?;
    let body = admin_views::questions_page(&questions, Some((NoticeKind::Danger, message)));
    Ok(views::page(&config.event_title, body, true).into_response())
}

/// Shows the console to an admin session, the login form otherwise.
pub async fn console(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
) -> Result<Response, AppError> {
    if !session.is_admin {
        return Ok(views::page(&config.event_title, admin_views::login_form(None), false).into_response());
    }

    let settings = Settings::load(&pool).await?;
    let question_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(&pool)
        .await?;
    let participant_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants")
        .fetch_one(&pool)
        .await?;

    let body = admin_views::console(&settings, question_count, participant_count);
    Ok(views::page(&config.event_title, body, true).into_response())
}

/// Checks the credential pair and marks the session as admin.
pub async fn login(
    State(config): State<Config>,
    State(authenticator): State<Arc<dyn Authenticator>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, AppError> {
    if !authenticator.authenticate(&payload.username, &payload.password) {
        tracing::warn!("Failed admin login for '{}'", payload.username);
        let body = admin_views::login_form(Some("Invalid username or password."));
        return Ok((
            StatusCode::UNAUTHORIZED,
            views::page(&config.event_title, body, false),
        )
            .into_response());
    }

    tracing::info!("Admin logged in");
    let session = Session {
        is_admin: true,
        ..session
    };

    Ok((session.cookie(&config)?, Redirect::to("/admin")).into_response())
}

pub async fn logout(State(config): State<Config>, session: Session) -> Result<Response, AppError> {
    let session = Session {
        is_admin: false,
        ..session
    };

    Ok((session.cookie(&config)?, Redirect::to("/admin")).into_response())
}

/// Flips the quiz between open and closed.
pub async fn toggle_quiz(State(pool): State<SqlitePool>) -> Result<Redirect, AppError> {
    let quiz_open = Settings::toggle_open(&pool).await.map_err(|e| {
        tracing::error!("Failed to toggle quiz state: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Quiz is now {}", if quiz_open { "open" } else { "closed" });
    Ok(Redirect::to("/admin"))
}

pub async fn timer_page(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<Response, AppError> {
    let settings = Settings::load(&pool).await?;
    let body = admin_views::timer_form(settings.timer_seconds, None);
    Ok(views::page(&config.event_title, body, true).into_response())
}

/// Stores `minutes * 60 + seconds` as the timer for quiz pages rendered from now on.
pub async fn set_timer(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    form: Result<Form<SetTimerRequest>, FormRejection>,
) -> Result<Response, AppError> {
    let payload = match form {
        Ok(Form(payload)) => payload,
        Err(rejection) => {
            tracing::info!("Timer form rejected: {}", rejection);
            return timer_error(&pool, &config, "Minutes and seconds must be whole numbers.").await;
        }
    };
    if let Err(validation_errors) = payload.validate() {
        return timer_error(&pool, &config, &first_validation_message(&validation_errors)).await;
    }

    let total = payload.total_seconds();
    Settings::set_timer(&pool, total).await.map_err(|e| {
        tracing::error!("Failed to set timer: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Timer set to {}s", total);
    Ok(Redirect::to("/admin").into_response())
}

pub async fn questions_page(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<Response, AppError> {
    let questions = list_questions(&pool).await?;
    let body = admin_views::questions_page(&questions, None);
    Ok(views::page(&config.event_title, body, true).into_response())
}

/// Creates a new quiz question.
///
/// Text is sanitized before storage; blank text or an unknown correct label is rejected.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    form: Result<Form<CreateQuestionRequest>, FormRejection>,
) -> Result<Response, AppError> {
    let payload = match form {
        Ok(Form(payload)) => payload,
        Err(rejection) => {
            tracing::info!("Question form rejected: {}", rejection);
            return question_error(
                &pool,
                &config,
                "Please fill in the question, all four options and the correct answer.",
            )
            .await;
        }
    };
    if let Err(validation_errors) = payload.validate() {
        return question_error(&pool, &config, &first_validation_message(&validation_errors)).await;
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO questions
        (content, option_a, option_b, option_c, option_d, correct)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(clean_html(&payload.content))
    .bind(clean_html(&payload.option_a))
    .bind(clean_html(&payload.option_b))
    .bind(clean_html(&payload.option_c))
    .bind(clean_html(&payload.option_d))
    .bind(&payload.correct)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Question {} added", id);

    let questions = list_questions(&pool).await?;
    let body = admin_views::questions_page(&questions, Some((NoticeKind::Success, "Question added.")));
    Ok((StatusCode::CREATED, views::page(&config.event_title, body, true)).into_response())
}

/// Deletes a quiz question by ID.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    tracing::info!("Question {} deleted", id);
    Ok(Redirect::to("/admin/questions"))
}

pub async fn clear_confirm(State(config): State<Config>) -> Response {
    views::page(&config.event_title, admin_views::clear_confirm(), true).into_response()
}

/// Deletes every participant. Questions and settings are untouched.
pub async fn clear_leaderboard(State(pool): State<SqlitePool>) -> Result<Redirect, AppError> {
    let result = sqlx::query("DELETE FROM participants")
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to clear leaderboard: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tracing::warn!("Leaderboard cleared ({} participants removed)", result.rows_affected());
    Ok(Redirect::to("/admin/leaderboard"))
}
