use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the already-authenticated caller, extracted once by the
/// session middleware and passed explicitly to whatever needs it.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct StudentProfile {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub course: Option<String>,
    pub semester: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub display_name: String,
    pub email: String,
    pub course: Option<String>,
    pub semester: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutProfileRequest {
    pub display_name: Option<String>,
    pub course: Option<String>,
    pub semester: Option<i32>,
}
