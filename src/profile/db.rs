use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    profile::models::{CreateProfileRequest, PutProfileRequest, StudentProfile},
    server::error::ServerError,
};

pub async fn create_profile(
    pool: &Pool<Postgres>,
    user_id: &Uuid,
    request: CreateProfileRequest,
) -> Result<StudentProfile, ServerError> {
    let now = Utc::now();

    let profile = sqlx::query_as::<_, StudentProfile>(
        r#"
        INSERT INTO "student_profile" (id, display_name, email, course, semester, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, display_name, email, course, semester, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&request.display_name)
    .bind(&request.email)
    .bind(&request.course)
    .bind(request.semester)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile_by_id(
    pool: &Pool<Postgres>,
    user_id: &Uuid,
) -> Result<StudentProfile, ServerError> {
    let profile = sqlx::query_as::<_, StudentProfile>(
        r#"
        SELECT id, display_name, email, course, semester, created_at, updated_at
        FROM "student_profile"
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!(
        "Profile with id {} does not exist",
        user_id
    )))?;

    Ok(profile)
}

pub async fn update_profile(
    pool: &Pool<Postgres>,
    user_id: &Uuid,
    request: PutProfileRequest,
) -> Result<StudentProfile, ServerError> {
    let profile = sqlx::query_as::<_, StudentProfile>(
        r#"
        UPDATE "student_profile"
        SET display_name = COALESCE($2, display_name),
            course = COALESCE($3, course),
            semester = COALESCE($4, semester),
            updated_at = $5
        WHERE id = $1
        RETURNING id, display_name, email, course, semester, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&request.display_name)
    .bind(&request.course)
    .bind(request.semester)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!(
        "Profile with id {} does not exist",
        user_id
    )))?;

    Ok(profile)
}
