use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::{quiz::attempts::AttemptRegistry, server::error::ServerError};

pub struct AppState {
    pool: Pool<Postgres>,
    attempts: AttemptRegistry,
}

impl AppState {
    pub async fn from_connection_string(connection_string: &str) -> Result<Arc<Self>, ServerError> {
        let pool = Pool::<Postgres>::connect(connection_string).await?;
        let attempts = AttemptRegistry::new();

        let state = Arc::new(Self { pool, attempts });

        Ok(state)
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    pub fn get_attempts(&self) -> &AttemptRegistry {
        &self.attempts
    }
}
