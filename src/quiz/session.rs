use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::{
    quiz::models::{AttemptResult, AttemptSnapshot, Direction, Phase, QuizDefinition},
    server::error::ServerError,
};

/// Full quiz points are awarded at or above this percentage, otherwise zero.
/// Fixed policy, not configurable per quiz.
pub const PASS_THRESHOLD_PERCENT: u8 = 70;

#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown decremented, attempt still running.
    Ticked(u32),
    /// Countdown hit zero, attempt moved to Submitting. Carries the one and
    /// only result; the caller owns persistence and completion.
    TimedOut(AttemptResult),
    /// Attempt is no longer running, the tick was a no-op.
    Ignored,
}

/// One user's run through a quiz: `NotStarted -> Running -> Submitting ->
/// Completed`. All mutation goes through these methods, and callers serialize
/// them behind one lock, so Submitting is entered at most once even when a
/// countdown tick races a manual submit.
pub struct QuizAttempt {
    id: Uuid,
    user_id: Uuid,
    definition: Arc<QuizDefinition>,
    phase: Phase,
    current_index: usize,
    answers: HashMap<usize, usize>,
    remaining_seconds: u32,
    result: Option<AttemptResult>,
    persisted: Option<bool>,
    events: watch::Sender<AttemptSnapshot>,
}

impl QuizAttempt {
    pub fn new(user_id: Uuid, definition: Arc<QuizDefinition>) -> Self {
        let id = Uuid::new_v4();
        let snapshot = AttemptSnapshot {
            attempt_id: id,
            quiz_id: definition.id,
            phase: Phase::NotStarted,
            current_index: 0,
            total_questions: definition.questions.len(),
            remaining_seconds: definition.time_limit_seconds(),
            answers: HashMap::new(),
            result: None,
            persisted: None,
        };
        let (events, _) = watch::channel(snapshot);
        let remaining_seconds = definition.time_limit_seconds();

        Self {
            id,
            user_id,
            definition,
            phase: Phase::NotStarted,
            current_index: 0,
            answers: HashMap::new(),
            remaining_seconds,
            result: None,
            persisted: None,
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    /// `None` until the attempt completes, then whether the result write
    /// succeeded. The timeout path surfaces write failures through this just
    /// like a manual submit does.
    pub fn persisted(&self) -> Option<bool> {
        self.persisted
    }

    /// Observers get a snapshot on every transition instead of reaching into
    /// shared mutable state.
    pub fn subscribe(&self) -> watch::Receiver<AttemptSnapshot> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> AttemptSnapshot {
        AttemptSnapshot {
            attempt_id: self.id,
            quiz_id: self.definition.id,
            phase: self.phase,
            current_index: self.current_index,
            total_questions: self.definition.questions.len(),
            remaining_seconds: self.remaining_seconds,
            answers: self.answers.clone(),
            result: self.result.clone(),
            persisted: self.persisted,
        }
    }

    pub fn start(&mut self) -> Result<(), ServerError> {
        if self.phase != Phase::NotStarted {
            return Err(ServerError::InvalidState(format!(
                "Cannot start attempt {} in phase {:?}",
                self.id, self.phase
            )));
        }

        self.phase = Phase::Running;
        self.current_index = 0;
        self.answers.clear();
        self.remaining_seconds = self.definition.time_limit_seconds();
        self.publish();

        Ok(())
    }

    /// Records or overwrites an answer. Any question may be answered, not
    /// just the current one, since the client allows backward navigation.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<(), ServerError> {
        if self.phase != Phase::Running {
            return Err(ServerError::InvalidState(format!(
                "Cannot answer in phase {:?}",
                self.phase
            )));
        }

        let Some(question) = self.definition.questions.get(question_index) else {
            return Err(ServerError::InvariantViolation(format!(
                "Question index {} out of bounds for quiz {}",
                question_index, self.definition.id
            )));
        };

        if option_index >= question.options.len() {
            return Err(ServerError::InvariantViolation(format!(
                "Option index {} out of bounds for question {}",
                option_index, question.id
            )));
        }

        self.answers.insert(question_index, option_index);
        self.publish();

        Ok(())
    }

    /// Moves the current-question pointer, clamped to the question range.
    /// Stepping past either boundary is a no-op.
    pub fn navigate(&mut self, direction: Direction) -> Result<(), ServerError> {
        if self.phase != Phase::Running {
            return Err(ServerError::InvalidState(format!(
                "Cannot navigate in phase {:?}",
                self.phase
            )));
        }

        let last = self.definition.questions.len() - 1;
        let next = match direction {
            Direction::Next => usize::min(self.current_index + 1, last),
            Direction::Previous => self.current_index.saturating_sub(1),
        };

        if next != self.current_index {
            self.current_index = next;
            self.publish();
        }

        Ok(())
    }

    /// One second of countdown. Reaching zero submits automatically and is
    /// indistinguishable from a manual submit. Ticks outside Running are
    /// no-ops, so a stale timer firing after submit or completion has no
    /// effect.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        if self.remaining_seconds == 0 {
            info!("Attempt {} ran out of time, submitting", self.id);
            return TickOutcome::TimedOut(self.begin_submit());
        }

        self.publish();
        TickOutcome::Ticked(self.remaining_seconds)
    }

    /// Manual submission. Unanswered questions score as incorrect, so this is
    /// legal at any point while running.
    pub fn submit(&mut self) -> Result<AttemptResult, ServerError> {
        if self.phase != Phase::Running {
            return Err(ServerError::InvalidState(format!(
                "Cannot submit attempt {} in phase {:?}",
                self.id, self.phase
            )));
        }

        Ok(self.begin_submit())
    }

    /// Marks the attempt terminal, recording whether the result write
    /// succeeded. Called after the persistence attempt on both the manual
    /// and the timeout submit path, whether or not the write succeeded.
    pub fn complete(&mut self, persisted: bool) {
        if self.phase != Phase::Submitting {
            return;
        }

        self.phase = Phase::Completed;
        self.persisted = Some(persisted);
        self.publish();
    }

    fn begin_submit(&mut self) -> AttemptResult {
        self.phase = Phase::Submitting;
        let result = self.score();
        self.result = Some(result.clone());
        self.publish();

        result
    }

    fn score(&self) -> AttemptResult {
        let total = self.definition.questions.len();
        let correct = self
            .definition
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| self.answers.get(index) == Some(&question.correct_answer))
            .count();

        let percentage = ((correct as f64 / total as f64) * 100.0).round() as u8;
        let awarded_points = if percentage >= PASS_THRESHOLD_PERCENT {
            self.definition.points
        } else {
            0
        };

        AttemptResult {
            quiz_id: self.definition.id,
            user_id: self.user_id,
            total_questions: total as u32,
            correct_answers: correct as u32,
            percentage,
            time_taken_seconds: self.definition.time_limit_seconds() - self.remaining_seconds,
            awarded_points,
            completed_at: Utc::now(),
        }
    }

    fn publish(&self) {
        self.events.send_replace(self.snapshot());
    }
}
