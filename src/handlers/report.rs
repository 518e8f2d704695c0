// src/handlers/report.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::participant::{Participant, fetch_leaderboard},
    report::{self, ChartData, XLSX_CONTENT_TYPE},
    views::{self, admin as admin_views},
};

/// Participants ranked by score, then by elapsed time.
pub async fn leaderboard(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<Response, AppError> {
    let entries = fetch_leaderboard(&pool).await.map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(views::page(&config.event_title, admin_views::leaderboard(&entries), true).into_response())
}

pub async fn participant_detail(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let participant = sqlx::query_as::<_, Participant>(
        r#"
        SELECT id, name, email, contact, score, started_at, finished_at
        FROM participants
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Participant not found".to_string()))?;

    let body = admin_views::participant_detail(&participant);
    Ok(views::page(&config.event_title, body, true).into_response())
}

pub async fn graph(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<Response, AppError> {
    let entries = fetch_leaderboard(&pool).await?;
    let data = ChartData::from_entries(&entries);
    Ok(views::page(&config.event_title, admin_views::graph(&data), true).into_response())
}

/// Downloads the leaderboard as an `.xlsx` workbook.
pub async fn export(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
) -> Result<Response, AppError> {
    let entries = fetch_leaderboard(&pool).await?;
    let rows = report::export_rows(&entries);
    let bytes = report::leaderboard_workbook(&format!("{} Leaderboard", config.event_title), &rows)?;

    tracing::info!("Exported leaderboard with {} rows", rows.len());

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"leaderboard.xlsx\""),
        ],
        bytes,
    )
        .into_response())
}
