use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use sqlx::{Pool, Postgres};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    quiz::{
        db,
        models::{AttemptResult, AttemptSnapshot, QuizDefinition},
        session::{QuizAttempt, TickOutcome},
    },
    server::error::ServerError,
};

struct ActiveAttempt {
    attempt: Arc<Mutex<QuizAttempt>>,
    countdown: JoinHandle<()>,
}

/// In-memory registry of running and recently finished attempts. One logical
/// session per attempt id; the countdown task is the only background writer
/// and goes through the same mutex as user intents.
pub struct AttemptRegistry {
    active: DashMap<Uuid, ActiveAttempt>,
}

impl AttemptRegistry {
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    /// Creates an attempt, starts it and spawns its countdown.
    pub async fn start_attempt(
        &self,
        pool: Pool<Postgres>,
        user_id: Uuid,
        definition: Arc<QuizDefinition>,
    ) -> Result<AttemptSnapshot, ServerError> {
        let mut attempt = QuizAttempt::new(user_id, definition);
        attempt.start()?;

        let attempt_id = attempt.id();
        let snapshot = attempt.snapshot();
        let attempt = Arc::new(Mutex::new(attempt));
        let countdown = spawn_countdown(pool, attempt.clone());

        self.active
            .insert(attempt_id, ActiveAttempt { attempt, countdown });

        info!("Started attempt {} for user {}", attempt_id, user_id);
        Ok(snapshot)
    }

    pub fn get(&self, attempt_id: &Uuid) -> Option<Arc<Mutex<QuizAttempt>>> {
        self.active
            .get(attempt_id)
            .map(|entry| entry.attempt.clone())
    }

    /// Drops an attempt and stops its countdown. An abandoned attempt applies
    /// no late writes; if it already completed this is plain cleanup.
    pub fn abandon(&self, attempt_id: &Uuid) -> bool {
        match self.active.remove(attempt_id) {
            Some((_, entry)) => {
                entry.countdown.abort();
                info!("Abandoned attempt {}", attempt_id);
                true
            }
            None => false,
        }
    }
}

/// Persists the result best-effort, then moves the attempt to Completed. A
/// failed write is logged and reported, never blocks the result.
pub async fn finalize_attempt(
    pool: &Pool<Postgres>,
    attempt: &Arc<Mutex<QuizAttempt>>,
    result: &AttemptResult,
) -> bool {
    let persisted = match db::tx_persist_attempt_result(pool, result).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Failed to persist result for quiz {} user {}: {}",
                result.quiz_id, result.user_id, e
            );
            false
        }
    };

    attempt.lock().await.complete(persisted);
    persisted
}

/// Drives the 1 Hz countdown. The task exits as soon as a tick observes the
/// attempt outside Running, so nothing fires after a manual submit has begun.
fn spawn_countdown(pool: Pool<Postgres>, attempt: Arc<Mutex<QuizAttempt>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first interval tick resolves immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let outcome = { attempt.lock().await.tick() };
            match outcome {
                TickOutcome::Ticked(_) => {}
                TickOutcome::TimedOut(result) => {
                    finalize_attempt(&pool, &attempt, &result).await;
                    break;
                }
                TickOutcome::Ignored => break,
            }
        }
    })
}
