// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::config::OPTION_LABELS;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: i64,

    /// Sanitized question text (may contain inline markup).
    pub content: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// Label of the correct option: one of 'a', 'b', 'c', 'd'.
    pub correct: String,
}

impl Question {
    /// Options paired with their labels, in display order.
    pub fn labeled_options(&self) -> [(&'static str, &str); 4] {
        [
            (OPTION_LABELS[0], self.option_a.as_str()),
            (OPTION_LABELS[1], self.option_b.as_str()),
            (OPTION_LABELS[2], self.option_c.as_str()),
            (OPTION_LABELS[3], self.option_d.as_str()),
        ]
    }
}

/// Question as delivered to a participant (excludes the correct label).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub content: String,
    pub options: Vec<(String, String)>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        let options = q
            .labeled_options()
            .iter()
            .map(|(label, text)| (label.to_string(), text.to_string()))
            .collect();
        PublicQuestion {
            id: q.id,
            content: q.content,
            options,
        }
    }
}

/// Form for authoring a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(custom(function = validate_text))]
    pub content: String,
    #[validate(custom(function = validate_text))]
    pub option_a: String,
    #[validate(custom(function = validate_text))]
    pub option_b: String,
    #[validate(custom(function = validate_text))]
    pub option_c: String,
    #[validate(custom(function = validate_text))]
    pub option_d: String,
    #[validate(custom(function = validate_label))]
    pub correct: String,
}

/// Rejects blank (whitespace only) and oversized text.
fn validate_text(text: &str) -> Result<(), validator::ValidationError> {
    if text.trim().is_empty() {
        return Err(validator::ValidationError::new("text_cannot_be_empty")
            .with_message("Question and option text cannot be empty.".into()));
    }
    if text.len() > 1000 {
        return Err(validator::ValidationError::new("text_too_long")
            .with_message("Question and option text must be at most 1000 characters.".into()));
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<(), validator::ValidationError> {
    if !OPTION_LABELS.contains(&label) {
        return Err(validator::ValidationError::new("invalid_label")
            .with_message("The correct answer must be one of a, b, c or d.".into()));
    }
    Ok(())
}
