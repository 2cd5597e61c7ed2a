use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::error::ServerError;

/// One question of a quiz. Option order is significant and fixed;
/// `correct_answer` is a zero-based index into `options`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// Immutable quiz definition as loaded from the store. Read-only to the
/// attempt state machine.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizDefinition {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub questions: Vec<Question>,
    pub time_limit_minutes: u32,
    pub points: i32,
}

impl QuizDefinition {
    pub fn from_row(row: QuizRow) -> Result<Self, ServerError> {
        let questions: Vec<Question> = serde_json::from_value(row.questions)?;

        if questions.is_empty() {
            return Err(ServerError::Internal(format!(
                "Quiz {} has no questions",
                row.id
            )));
        }

        for question in &questions {
            if question.correct_answer >= question.options.len() {
                return Err(ServerError::InvariantViolation(format!(
                    "Quiz {} question {} has correct answer index {} out of {} options",
                    row.id,
                    question.id,
                    question.correct_answer,
                    question.options.len()
                )));
            }
        }

        let time_limit_minutes = u32::try_from(row.time_limit_minutes).map_err(|_| {
            ServerError::InvariantViolation(format!(
                "Quiz {} has negative time limit {}",
                row.id, row.time_limit_minutes
            ))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            difficulty: row.difficulty,
            questions,
            time_limit_minutes,
            points: row.points,
        })
    }

    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_minutes * 60
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct QuizRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub questions: serde_json::Value,
    pub time_limit_minutes: i32,
    pub points: i32,
}

/// Listing shape for the quizzes page. Questions stay server-side, only the
/// count is exposed.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub question_count: i32,
    pub time_limit_minutes: i32,
    pub points: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizPageRequest {
    pub page_num: u16,
    pub category: Option<String>,
}

/// Named state of one quiz attempt.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Running,
    Submitting,
    Completed,
}

/// Derived once at submit time, never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub quiz_id: Uuid,
    pub user_id: Uuid,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub percentage: u8,
    pub time_taken_seconds: u32,
    pub awarded_points: i32,
    pub completed_at: DateTime<Utc>,
}

/// Read model of an attempt, published on every transition.
#[derive(Debug, Serialize, Clone)]
pub struct AttemptSnapshot {
    pub attempt_id: Uuid,
    pub quiz_id: Uuid,
    pub phase: Phase,
    pub current_index: usize,
    pub total_questions: usize,
    pub remaining_seconds: u32,
    pub answers: HashMap<usize, usize>,
    pub result: Option<AttemptResult>,
    /// `None` until completed, then whether the result write succeeded.
    pub persisted: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question_index: usize,
    pub option_index: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

/// Submit response. `persisted == false` means the result was computed but
/// the write failed; the client shows the result with a warning.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub result: AttemptResult,
    pub persisted: bool,
    pub warning: Option<String>,
}

impl SubmitResponse {
    pub fn new(result: AttemptResult, persisted: bool) -> Self {
        let warning = (!persisted)
            .then(|| "Result could not be saved, your score is shown but not recorded".to_string());

        Self {
            result,
            persisted,
            warning,
        }
    }
}
