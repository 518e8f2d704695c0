// src/models/participant.rs

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

/// Represents the 'participants' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participant {
    pub id: i64,

    pub name: String,

    /// Unique across all participants.
    pub email: String,

    pub contact: String,

    /// Number of correct answers; 0 until the quiz is submitted.
    pub score: i64,

    /// Set when the access code is verified.
    pub started_at: DateTime<Utc>,

    /// Set on submission. `None` while the quiz is still in progress.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// Seconds between verification and submission.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

/// Registration form, kept in the session until the access code is verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PendingRegistration {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "Contact must be between 1 and 30 characters."))]
    pub contact: String,
}

impl PendingRegistration {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            contact: self.contact.trim().to_string(),
        }
    }
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position, computed at read time.
    pub rank: usize,
    pub participant: Participant,
}

/// Orders participants by descending score, then ascending elapsed time.
/// Participants who have not submitted yet sort after finished ones with the same score.
pub fn leaderboard_order(a: &Participant, b: &Participant) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| match (a.elapsed_seconds(), b.elapsed_seconds()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts participants into leaderboard order and assigns ranks 1..N.
pub fn rank_participants(mut participants: Vec<Participant>) -> Vec<LeaderboardEntry> {
    participants.sort_by(leaderboard_order);
    participants
        .into_iter()
        .enumerate()
        .map(|(i, participant)| LeaderboardEntry {
            rank: i + 1,
            participant,
        })
        .collect()
}

/// Loads every participant and returns them ranked.
pub async fn fetch_leaderboard(pool: &SqlitePool) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    let participants = sqlx::query_as::<_, Participant>(
        r#"
        SELECT id, name, email, contact, score, started_at, finished_at
        FROM participants
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rank_participants(participants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn participant(id: i64, score: i64, elapsed_ms: Option<i64>) -> Participant {
        let start = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();
        Participant {
            id,
            name: format!("p{}", id),
            email: format!("p{}@example.com", id),
            contact: "000".to_string(),
            score,
            started_at: start,
            finished_at: elapsed_ms.map(|ms| start + Duration::milliseconds(ms)),
        }
    }

    #[test]
    fn higher_score_ranks_first() {
        let ranked = rank_participants(vec![
            participant(1, 2, Some(10_000)),
            participant(2, 5, Some(90_000)),
        ]);

        assert_eq!(ranked[0].participant.id, 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn equal_scores_break_ties_on_elapsed_time() {
        let ranked = rank_participants(vec![
            participant(1, 3, Some(42_500)),
            participant(2, 3, Some(30_100)),
        ]);

        assert_eq!(ranked[0].participant.id, 2);
        assert_eq!(ranked[0].participant.elapsed_seconds(), Some(30.1));
        assert_eq!(ranked[1].participant.id, 1);
    }

    #[test]
    fn unfinished_participants_trail_same_score() {
        let ranked = rank_participants(vec![
            participant(1, 0, None),
            participant(2, 0, Some(5_000)),
        ]);

        assert_eq!(ranked[0].participant.id, 2);
        assert_eq!(ranked[1].participant.elapsed_seconds(), None);
    }

    #[test]
    fn ranks_are_contiguous() {
        let ranked = rank_participants((1..=5).map(|i| participant(i, i % 3, Some(i * 1000))).collect());
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn registration_validation() {
        let ok = PendingRegistration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            contact: "555".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = PendingRegistration {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad.validate().is_err());

        let blank = PendingRegistration {
            name: "".to_string(),
            ..ok
        };
        assert!(blank.validate().is_err());
    }
}
