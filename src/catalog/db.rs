use sqlx::{Pool, Postgres};

use crate::{
    catalog::models::{
        Course, CoursePageRequest, Opportunity, OpportunityPageRequest, Subject,
        SubjectPageRequest,
    },
    common::models::PagedResponse,
    config::config::CONFIG,
    server::error::ServerError,
};

pub async fn get_course_page(
    pool: &Pool<Postgres>,
    request: CoursePageRequest,
) -> Result<PagedResponse<Course>, ServerError> {
    let page_size = CONFIG.server.page_size as i64;
    let offset = page_size * request.page_num as i64;

    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, branches
        FROM "course"
        ORDER BY name
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page_size + 1)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(PagedResponse::from_overfetch(courses, page_size as usize))
}

pub async fn get_subject_page(
    pool: &Pool<Postgres>,
    request: SubjectPageRequest,
) -> Result<PagedResponse<Subject>, ServerError> {
    let page_size = CONFIG.server.page_size as i64;
    let offset = page_size * request.page_num as i64;

    let subjects = match &request.course_id {
        Some(course_id) => {
            sqlx::query_as::<_, Subject>(
                r#"
                SELECT id, course_id, name, semester
                FROM "subject"
                WHERE course_id = $1
                ORDER BY semester, name
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(course_id)
            .bind(page_size + 1)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Subject>(
                r#"
                SELECT id, course_id, name, semester
                FROM "subject"
                ORDER BY semester, name
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page_size + 1)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(PagedResponse::from_overfetch(subjects, page_size as usize))
}

pub async fn get_opportunity_page(
    pool: &Pool<Postgres>,
    request: OpportunityPageRequest,
) -> Result<PagedResponse<Opportunity>, ServerError> {
    let page_size = CONFIG.server.page_size as i64;
    let offset = page_size * request.page_num as i64;

    let opportunities = match request.opportunity_type {
        Some(opportunity_type) => {
            sqlx::query_as::<_, Opportunity>(
                r#"
                SELECT id, title, company, opportunity_type, location, description,
                       event_date, deadline
                FROM "opportunity"
                WHERE opportunity_type = $1
                ORDER BY deadline NULLS LAST, event_date NULLS LAST
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(opportunity_type)
            .bind(page_size + 1)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Opportunity>(
                r#"
                SELECT id, title, company, opportunity_type, location, description,
                       event_date, deadline
                FROM "opportunity"
                ORDER BY deadline NULLS LAST, event_date NULLS LAST
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page_size + 1)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(PagedResponse::from_overfetch(
        opportunities,
        page_size as usize,
    ))
}
