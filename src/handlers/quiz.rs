// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, first_validation_message, is_unique_violation},
    models::{
        participant::PendingRegistration,
        question::{PublicQuestion, Question},
        settings::Settings,
    },
    utils::session::Session,
    views::{self, quiz as quiz_views},
};

/// Helper struct for fetching answer keys from the database.
#[derive(sqlx::FromRow)]
struct AnswerKey {
    id: i64,
    correct: String,
}

/// Form posted from the access code page.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
}

/// Where a bound participant is in the flow.
enum ParticipantStatus {
    Missing,
    InProgress,
    Finished,
}

async fn participant_status(pool: &SqlitePool, participant_id: i64) -> Result<ParticipantStatus, AppError> {
    let finished_at = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
        "SELECT finished_at FROM participants WHERE id = ?",
    )
    .bind(participant_id)
    .fetch_optional(pool)
    .await?;

    Ok(match finished_at {
        None => ParticipantStatus::Missing,
        Some(None) => ParticipantStatus::InProgress,
        Some(Some(_)) => ParticipantStatus::Finished,
    })
}

/// Counts submitted answers that match the stored correct label.
/// Answers to unknown question ids score nothing.
fn calculate_score(user_answers: &HashMap<i64, String>, answer_key: &HashMap<i64, String>) -> i64 {
    let mut score = 0;
    for (q_id, user_ans) in user_answers {
        // Simple strict string matching
        if answer_key.get(q_id) == Some(user_ans) {
            score += 1;
        }
    }
    score
}

/// Keeps only form fields whose name is a question id.
fn parse_answers(form: HashMap<String, String>) -> HashMap<i64, String> {
    form.into_iter()
        .filter_map(|(key, value)| key.parse::<i64>().ok().map(|id| (id, value)))
        .collect()
}

/// Shows the registration form, or the closed notice while the quiz is closed.
pub async fn register_page(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
) -> Result<Response, AppError> {
    if session.participant_id.is_some() {
        return Ok(Redirect::to("/quiz").into_response());
    }

    let settings = Settings::load(&pool).await?;
    let body = if settings.quiz_open {
        quiz_views::registration_form(None)
    } else {
        quiz_views::closed()
    };

    Ok(views::page(&config.event_title, body, session.is_admin).into_response())
}

/// Records the registration fields in the session and moves on to code verification.
///
/// Nothing is persisted until the access code is verified.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
    form: Result<Form<PendingRegistration>, FormRejection>,
) -> Result<Response, AppError> {
    if session.participant_id.is_some() {
        return Ok(Redirect::to("/quiz").into_response());
    }

    let settings = Settings::load(&pool).await?;
    if !settings.quiz_open {
        tracing::info!("Registration rejected: quiz is closed");
        return Ok(views::page(&config.event_title, quiz_views::closed(), session.is_admin).into_response());
    }

    let payload = match form {
        Ok(Form(payload)) => payload.normalized(),
        Err(rejection) => {
            tracing::info!("Registration form rejected: {}", rejection);
            let body = quiz_views::registration_form(Some("Please fill in your name, email and contact."));
            return Ok(views::page(&config.event_title, body, session.is_admin).into_response());
        }
    };
    if let Err(validation_errors) = payload.validate() {
        let message = first_validation_message(&validation_errors);
        let body = quiz_views::registration_form(Some(&message));
        return Ok(views::page(&config.event_title, body, session.is_admin).into_response());
    }

    let taken = sqlx::query_scalar::<_, i64>("SELECT id FROM participants WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?;

    if taken.is_some() {
        tracing::info!("Registration rejected: email already registered");
        let body = quiz_views::registration_form(Some("This email has already been registered."));
        return Ok(views::page(&config.event_title, body, session.is_admin).into_response());
    }

    let session = Session {
        pending: Some(payload),
        participant_id: None,
        ..session
    };

    Ok((session.cookie(&config)?, Redirect::to("/verify")).into_response())
}

/// Shows the access code form. Requires pending registration fields.
pub async fn verify_page(State(config): State<Config>, session: Session) -> Response {
    if session.pending.is_none() {
        return Redirect::to("/").into_response();
    }

    views::page(&config.event_title, quiz_views::code_form(None), session.is_admin).into_response()
}

/// Checks the shared access code and creates the participant.
///
/// * Quiz closed: nothing is created, the pending fields stay in the session.
/// * Wrong code: the pending fields stay in the session for another attempt.
/// * Correct code: inserts the participant with `started_at = now` and binds its id to the session.
pub async fn verify(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
    Form(payload): Form<VerifyRequest>,
) -> Result<Response, AppError> {
    let Some(pending) = session.pending.clone() else {
        return Ok(Redirect::to("/").into_response());
    };

    let settings = Settings::load(&pool).await?;
    if !settings.quiz_open {
        tracing::info!("Verification rejected: quiz is closed");
        return Ok(views::page(&config.event_title, quiz_views::closed(), session.is_admin).into_response());
    }

    if payload.code.trim() != config.access_code {
        tracing::info!("Access code rejected");
        let body = quiz_views::code_form(Some("Wrong access code. Please try again."));
        return Ok(views::page(&config.event_title, body, session.is_admin).into_response());
    }

    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO participants (name, email, contact, started_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&pending.name)
    .bind(&pending.email)
    .bind(&pending.contact)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await;

    let participant_id = match inserted {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            tracing::info!("Verification rejected: email already registered");
            let session = Session {
                pending: None,
                ..session
            };
            let body = quiz_views::registration_form(Some("This email has already been registered."));
            return Ok((
                session.cookie(&config)?,
                views::page(&config.event_title, body, session.is_admin),
            )
                .into_response());
        }
        Err(e) => {
            tracing::error!("Failed to create participant: {:?}", e);
            return Err(AppError::from(e));
        }
    };

    tracing::info!("Participant {} verified", participant_id);

    let session = Session {
        pending: None,
        participant_id: Some(participant_id),
        ..session
    };

    Ok((session.cookie(&config)?, Redirect::to("/quiz")).into_response())
}

/// Delivers every question in a freshly shuffled order, with the current timer.
pub async fn quiz_page(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(participant_id) = session.participant_id else {
        return Ok(Redirect::to("/").into_response());
    };

    match participant_status(&pool, participant_id).await? {
        // Participant row is gone (leaderboard cleared): start over.
        ParticipantStatus::Missing => {
            let session = Session {
                participant_id: None,
                ..session
            };
            return Ok((session.cookie(&config)?, Redirect::to("/")).into_response());
        }
        ParticipantStatus::Finished => {
            let session = Session {
                participant_id: None,
                ..session
            };
            return Ok((
                session.cookie(&config)?,
                views::page(&config.event_title, quiz_views::submitted(), session.is_admin),
            )
                .into_response());
        }
        ParticipantStatus::InProgress => {}
    }

    let settings = Settings::load(&pool).await?;
    if !settings.quiz_open {
        return Ok(views::page(&config.event_title, quiz_views::closed(), session.is_admin).into_response());
    }

    let mut questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, content, option_a, option_b, option_c, option_d, correct
        FROM questions
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if questions.is_empty() {
        return Ok(views::page(&config.event_title, quiz_views::unavailable(), session.is_admin).into_response());
    }

    questions.shuffle(&mut rand::thread_rng());
    let questions: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();

    let body = quiz_views::quiz_form(&questions, settings.timer_seconds);
    Ok(views::page(&config.event_title, body, session.is_admin).into_response())
}

/// Scores a submission and records it on the bound participant.
///
/// * Form field names are question ids, values the chosen label.
/// * The score is written only once; later submits leave the stored result untouched.
/// * The participant binding is removed from the session.
pub async fn submit(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let Some(participant_id) = session.participant_id else {
        return Ok(Redirect::to("/").into_response());
    };

    let unbound = Session {
        participant_id: None,
        ..session
    };

    match participant_status(&pool, participant_id).await? {
        ParticipantStatus::Missing => {
            tracing::info!("Submission for removed participant {} discarded", participant_id);
            return Ok((unbound.cookie(&config)?, Redirect::to("/")).into_response());
        }
        ParticipantStatus::Finished => {
            tracing::info!("Ignoring repeated submission for participant {}", participant_id);
            return Ok((
                unbound.cookie(&config)?,
                views::page(&config.event_title, quiz_views::submitted(), unbound.is_admin),
            )
                .into_response());
        }
        ParticipantStatus::InProgress => {}
    }

    let user_answers = parse_answers(form);

    // The question bank is small: load the whole key instead of binding every submitted id.
    let answer_key: HashMap<i64, String> =
        sqlx::query_as::<_, AnswerKey>("SELECT id, correct FROM questions")
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch answer key: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?
            .into_iter()
            .map(|k| (k.id, k.correct))
            .collect();

    let score = calculate_score(&user_answers, &answer_key);

    let result = sqlx::query(
        r#"
        UPDATE participants
        SET score = ?, finished_at = ?
        WHERE id = ? AND finished_at IS NULL
        "#,
    )
    .bind(score)
    .bind(Utc::now())
    .bind(participant_id)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        // Removed or scored by another request between the status check and the update.
        tracing::info!("Submission for participant {} not recorded", participant_id);
        return Ok((unbound.cookie(&config)?, Redirect::to("/")).into_response());
    }

    tracing::info!("Participant {} submitted with score {}", participant_id, score);

    Ok((
        unbound.cookie(&config)?,
        views::page(&config.event_title, quiz_views::submitted(), unbound.is_admin),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> HashMap<i64, String> {
        HashMap::from([
            (1, "a".to_string()),
            (2, "b".to_string()),
            (3, "c".to_string()),
        ])
    }

    #[test]
    fn test_calculate_score_counts_matches() {
        let user_answers = HashMap::from([
            (1, "a".to_string()),
            (2, "c".to_string()), // Wrong
            (3, "c".to_string()),
        ]);

        assert_eq!(calculate_score(&user_answers, &key()), 2);
    }

    #[test]
    fn test_calculate_score_ignores_unknown_questions() {
        let user_answers = HashMap::from([(1, "a".to_string()), (999, "a".to_string())]);

        assert_eq!(calculate_score(&user_answers, &key()), 1);
    }

    #[test]
    fn test_calculate_score_empty() {
        assert_eq!(calculate_score(&HashMap::new(), &key()), 0);
    }

    #[test]
    fn test_parse_answers_skips_non_numeric_fields() {
        let form = HashMap::from([
            ("4".to_string(), "b".to_string()),
            ("csrf".to_string(), "x".to_string()),
            ("-".to_string(), "a".to_string()),
        ]);

        let parsed = parse_answers(form);
        assert_eq!(parsed, HashMap::from([(4, "b".to_string())]));
    }
}
