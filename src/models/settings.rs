// src/models/settings.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

/// The singleton 'settings' row (id = 1).
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct Settings {
    /// Countdown shown on every quiz page rendered from now on.
    pub timer_seconds: i64,
    /// Whether registration and quiz-taking are currently allowed.
    pub quiz_open: bool,
}

impl Settings {
    /// Inserts the settings row unless it already exists. Quiz starts open.
    pub async fn ensure_initialized(pool: &SqlitePool, timer_seconds: i64) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO settings (id, timer_seconds, quiz_open) VALUES (1, ?, 1)",
        )
        .bind(timer_seconds)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Settings initialized with a {}s timer", timer_seconds);
        }
        Ok(())
    }

    pub async fn load(pool: &SqlitePool) -> Result<Settings, sqlx::Error> {
        sqlx::query_as::<_, Settings>("SELECT timer_seconds, quiz_open FROM settings WHERE id = 1")
            .fetch_one(pool)
            .await
    }

    /// Flips the open flag and returns the new value.
    pub async fn toggle_open(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
        let (quiz_open,): (bool,) = sqlx::query_as(
            "UPDATE settings SET quiz_open = NOT quiz_open WHERE id = 1 RETURNING quiz_open",
        )
        .fetch_one(pool)
        .await?;
        Ok(quiz_open)
    }

    pub async fn set_timer(pool: &SqlitePool, timer_seconds: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE settings SET timer_seconds = ? WHERE id = 1")
            .bind(timer_seconds)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Form for the timer page: minutes and seconds.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_nonzero_timer))]
pub struct SetTimerRequest {
    #[validate(range(min = 0, max = 600, message = "Minutes must be between 0 and 600."))]
    pub minutes: i64,
    #[validate(range(min = 0, max = 59, message = "Seconds must be between 0 and 59."))]
    pub seconds: i64,
}

impl SetTimerRequest {
    pub fn total_seconds(&self) -> i64 {
        self.minutes * 60 + self.seconds
    }
}

fn validate_nonzero_timer(req: &SetTimerRequest) -> Result<(), validator::ValidationError> {
    if req.total_seconds() <= 0 {
        return Err(validator::ValidationError::new("timer_must_be_positive")
            .with_message("The timer must be longer than zero seconds.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_minutes_thirty_is_150_seconds() {
        let req = SetTimerRequest { minutes: 2, seconds: 30 };
        assert!(req.validate().is_ok());
        assert_eq!(req.total_seconds(), 150);
    }

    #[test]
    fn rejects_zero_and_out_of_range() {
        assert!(SetTimerRequest { minutes: 0, seconds: 0 }.validate().is_err());
        assert!(SetTimerRequest { minutes: 1, seconds: 60 }.validate().is_err());
        assert!(SetTimerRequest { minutes: -1, seconds: 10 }.validate().is_err());
    }
}
