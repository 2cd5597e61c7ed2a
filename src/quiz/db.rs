use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    common::models::PagedResponse,
    config::config::CONFIG,
    quiz::models::{AttemptResult, QuizDefinition, QuizPageRequest, QuizRow, QuizSummary},
    server::error::ServerError,
};

pub async fn get_quiz_by_id(
    pool: &Pool<Postgres>,
    quiz_id: &Uuid,
) -> Result<QuizDefinition, ServerError> {
    let row = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT id, title, description, category, difficulty, questions, time_limit_minutes, points
        FROM "quiz"
        WHERE id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!(
        "Quiz with id {} does not exist",
        quiz_id
    )))?;

    QuizDefinition::from_row(row)
}

pub async fn get_quiz_page(
    pool: &Pool<Postgres>,
    request: QuizPageRequest,
) -> Result<PagedResponse<QuizSummary>, ServerError> {
    let page_size = CONFIG.server.page_size as i64;
    let offset = page_size * request.page_num as i64;

    let summaries = match &request.category {
        Some(category) => {
            sqlx::query_as::<_, QuizSummary>(
                r#"
                SELECT id, title, description, category, difficulty,
                       jsonb_array_length(questions) AS question_count,
                       time_limit_minutes, points
                FROM "quiz"
                WHERE category = $1
                ORDER BY title
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(category)
            .bind(page_size + 1)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, QuizSummary>(
                r#"
                SELECT id, title, description, category, difficulty,
                       jsonb_array_length(questions) AS question_count,
                       time_limit_minutes, points
                FROM "quiz"
                ORDER BY title
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page_size + 1)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(PagedResponse::from_overfetch(summaries, page_size as usize))
}

/// Writes the result record and bumps the user's aggregate in one
/// transaction. Result rows are keyed per attempt and never overwritten; the
/// aggregate is created on first write, incremented afterwards.
pub async fn tx_persist_attempt_result(
    pool: &Pool<Postgres>,
    result: &AttemptResult,
) -> Result<(), ServerError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        INSERT INTO "quiz_result"
            (id, quiz_id, user_id, total_questions, correct_answers, percentage,
             time_taken_seconds, awarded_points, completed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(result.quiz_id)
    .bind(result.user_id)
    .bind(result.total_questions as i32)
    .bind(result.correct_answers as i32)
    .bind(result.percentage as i32)
    .bind(result.time_taken_seconds as i32)
    .bind(result.awarded_points)
    .bind(result.completed_at)
    .execute(&mut *tx)
    .await?;

    if row.rows_affected() == 0 {
        return Err(ServerError::Persistence(
            "Failed to insert quiz result".into(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO "user_progress"
            (user_id, completed_quizzes, assignments_submitted, courses_completed, total_points)
        VALUES ($1, 1, 0, 0, $2)
        ON CONFLICT (user_id) DO UPDATE
        SET completed_quizzes = "user_progress".completed_quizzes + 1,
            total_points = "user_progress".total_points + EXCLUDED.total_points
        "#,
    )
    .bind(result.user_id)
    .bind(result.awarded_points)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}
