use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user accumulated statistics. Owned by the store; this service only
/// reads it and applies monotonic increments.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct UserProgress {
    pub user_id: Uuid,
    pub completed_quizzes: i32,
    pub assignments_submitted: i32,
    pub courses_completed: i32,
    pub total_points: i32,
}

impl UserProgress {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            completed_quizzes: 0,
            assignments_submitted: 0,
            courses_completed: 0,
            total_points: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub display_name: String,
    pub total_points: i32,
    pub completed_quizzes: i32,
}
