use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    config::config::CONFIG,
    progress::models::{LeaderboardEntry, UserProgress},
    server::error::ServerError,
};

/// A user without writes yet simply has the zero aggregate.
pub async fn get_user_progress(
    pool: &Pool<Postgres>,
    user_id: &Uuid,
) -> Result<UserProgress, ServerError> {
    let progress = sqlx::query_as::<_, UserProgress>(
        r#"
        SELECT user_id, completed_quizzes, assignments_submitted, courses_completed, total_points
        FROM "user_progress"
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .unwrap_or(UserProgress::empty(*user_id));

    Ok(progress)
}

pub async fn record_assignment_submission(
    pool: &Pool<Postgres>,
    user_id: &Uuid,
) -> Result<UserProgress, ServerError> {
    let progress = sqlx::query_as::<_, UserProgress>(
        r#"
        INSERT INTO "user_progress"
            (user_id, completed_quizzes, assignments_submitted, courses_completed, total_points)
        VALUES ($1, 0, 1, 0, 0)
        ON CONFLICT (user_id) DO UPDATE
        SET assignments_submitted = "user_progress".assignments_submitted + 1
        RETURNING user_id, completed_quizzes, assignments_submitted, courses_completed, total_points
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(progress)
}

pub async fn get_leaderboard(pool: &Pool<Postgres>) -> Result<Vec<LeaderboardEntry>, ServerError> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT p.user_id, s.display_name, p.total_points, p.completed_quizzes
        FROM "user_progress" p
        JOIN "student_profile" s ON s.id = p.user_id
        ORDER BY p.total_points DESC, p.completed_quizzes DESC
        LIMIT $1
        "#,
    )
    .bind(CONFIG.server.leaderboard_size as i64)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
