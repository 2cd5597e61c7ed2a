#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::{Pool, Postgres};
    use uuid::Uuid;

    use crate::{
        quiz::{
            attempts::AttemptRegistry,
            models::{Direction, Phase, Question, QuizDefinition, QuizRow},
            session::{QuizAttempt, TickOutcome},
        },
        server::error::ServerError,
    };

    fn sample_quiz(time_limit_minutes: u32) -> Arc<QuizDefinition> {
        let key = [0, 1, 1, 0, 1];
        let questions = key
            .iter()
            .enumerate()
            .map(|(index, correct)| Question {
                id: format!("q{}", index + 1),
                prompt: format!("Question {}", index + 1),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: *correct,
            })
            .collect();

        Arc::new(QuizDefinition {
            id: Uuid::new_v4(),
            title: "Sample quiz".into(),
            description: None,
            category: Some("general".into()),
            difficulty: None,
            questions,
            time_limit_minutes,
            points: 100,
        })
    }

    fn running_attempt(time_limit_minutes: u32) -> QuizAttempt {
        let mut attempt = QuizAttempt::new(Uuid::new_v4(), sample_quiz(time_limit_minutes));
        attempt.start().unwrap();
        attempt
    }

    #[test]
    fn start_initializes_attempt() {
        let attempt = running_attempt(15);
        let snapshot = attempt.snapshot();

        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.remaining_seconds, 15 * 60);
        assert!(snapshot.answers.is_empty());
    }

    #[test]
    fn start_twice_is_invalid_state() {
        let mut attempt = running_attempt(15);

        let result = attempt.start();
        assert!(matches!(result, Err(ServerError::InvalidState(_))));
        assert_eq!(attempt.phase(), Phase::Running);
    }

    #[test]
    fn later_selection_overwrites_earlier() {
        let mut attempt = running_attempt(15);

        attempt.select_answer(0, 2).unwrap();
        attempt.select_answer(0, 0).unwrap();

        assert_eq!(attempt.snapshot().answers.get(&0), Some(&0));
        assert_eq!(attempt.snapshot().answers.len(), 1);
    }

    #[test]
    fn answering_non_current_question_is_allowed() {
        let mut attempt = running_attempt(15);

        // Still on question 0, answering question 3 (backward navigation in
        // the client makes this legal).
        attempt.select_answer(3, 0).unwrap();

        assert_eq!(attempt.snapshot().current_index, 0);
        assert_eq!(attempt.snapshot().answers.get(&3), Some(&0));
    }

    #[test]
    fn out_of_range_option_is_invariant_violation() {
        let mut attempt = running_attempt(15);

        let result = attempt.select_answer(0, 4);
        assert!(matches!(result, Err(ServerError::InvariantViolation(_))));
        assert!(attempt.snapshot().answers.is_empty());

        let result = attempt.select_answer(9, 0);
        assert!(matches!(result, Err(ServerError::InvariantViolation(_))));
    }

    #[test]
    fn navigation_clamps_at_bounds() {
        let mut attempt = running_attempt(15);

        attempt.navigate(Direction::Previous).unwrap();
        assert_eq!(attempt.snapshot().current_index, 0);

        for _ in 0..10 {
            attempt.navigate(Direction::Next).unwrap();
        }
        assert_eq!(attempt.snapshot().current_index, 4);

        attempt.navigate(Direction::Previous).unwrap();
        assert_eq!(attempt.snapshot().current_index, 3);
    }

    #[test]
    fn tick_decrements_by_one_per_second() {
        let mut attempt = running_attempt(15);

        for expected in (890u32..900).rev() {
            match attempt.tick() {
                TickOutcome::Ticked(remaining) => assert_eq!(remaining, expected),
                other => panic!("Unexpected outcome: {:?}", other),
            }
        }

        assert_eq!(attempt.snapshot().remaining_seconds, 890);
    }

    #[test]
    fn countdown_reaching_zero_submits_exactly_once() {
        let mut attempt = running_attempt(1);

        // 3 of 5 answered when time runs out, all of them correct.
        attempt.select_answer(0, 0).unwrap();
        attempt.select_answer(1, 1).unwrap();
        attempt.select_answer(2, 1).unwrap();

        let mut timeouts = 0;
        for _ in 0..60 {
            if let TickOutcome::TimedOut(result) = attempt.tick() {
                timeouts += 1;
                assert_eq!(result.correct_answers, 3);
                assert_eq!(result.percentage, 60);
                assert_eq!(result.awarded_points, 0);
                assert_eq!(result.time_taken_seconds, 60);
            }
        }

        assert_eq!(timeouts, 1);
        assert_eq!(attempt.phase(), Phase::Submitting);
        assert_eq!(attempt.snapshot().remaining_seconds, 0);

        // A dangling timer firing after the terminal transition is a no-op.
        assert_eq!(attempt.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn stale_tick_after_manual_submit_is_ignored() {
        let mut attempt = running_attempt(15);
        attempt.select_answer(0, 0).unwrap();

        let result = attempt.submit().unwrap();
        assert_eq!(attempt.phase(), Phase::Submitting);

        // The racing tick must not produce a second result.
        assert_eq!(attempt.tick(), TickOutcome::Ignored);
        assert_eq!(attempt.result(), Some(&result));
    }

    #[test]
    fn completed_is_terminal() {
        let mut attempt = running_attempt(15);
        attempt.select_answer(0, 0).unwrap();

        let result = attempt.submit().unwrap();
        attempt.complete(true);
        assert_eq!(attempt.phase(), Phase::Completed);
        assert_eq!(attempt.persisted(), Some(true));

        let before = attempt.snapshot();

        assert!(matches!(attempt.submit(), Err(ServerError::InvalidState(_))));
        assert_eq!(attempt.tick(), TickOutcome::Ignored);
        assert!(matches!(
            attempt.select_answer(1, 1),
            Err(ServerError::InvalidState(_))
        ));
        assert!(matches!(
            attempt.navigate(Direction::Next),
            Err(ServerError::InvalidState(_))
        ));

        let after = attempt.snapshot();
        assert_eq!(after.phase, Phase::Completed);
        assert_eq!(after.answers, before.answers);
        assert_eq!(after.remaining_seconds, before.remaining_seconds);
        assert_eq!(attempt.result(), Some(&result));
    }

    #[test]
    fn time_taken_reflects_elapsed_ticks() {
        let mut attempt = running_attempt(15);

        for _ in 0..10 {
            attempt.tick();
        }

        let result = attempt.submit().unwrap();
        assert_eq!(result.time_taken_seconds, 10);
    }

    #[test]
    fn every_transition_publishes_a_snapshot() {
        let mut attempt = QuizAttempt::new(Uuid::new_v4(), sample_quiz(15));
        let mut events = attempt.subscribe();

        attempt.start().unwrap();
        assert!(events.has_changed().unwrap());
        assert_eq!(events.borrow_and_update().phase, Phase::Running);

        attempt.select_answer(0, 0).unwrap();
        assert!(events.has_changed().unwrap());
        assert_eq!(events.borrow_and_update().answers.get(&0), Some(&0));

        attempt.navigate(Direction::Next).unwrap();
        assert!(events.has_changed().unwrap());
        assert_eq!(events.borrow_and_update().current_index, 1);

        attempt.submit().unwrap();
        assert!(events.has_changed().unwrap());
        assert_eq!(events.borrow_and_update().phase, Phase::Submitting);

        attempt.complete(true);
        assert!(events.has_changed().unwrap());
        let snapshot = events.borrow_and_update();
        assert_eq!(snapshot.phase, Phase::Completed);
        assert!(snapshot.result.is_some());
        assert_eq!(snapshot.persisted, Some(true));
    }

    #[test]
    fn timed_out_attempt_reports_failed_write() {
        let mut attempt = running_attempt(1);

        let mut result = None;
        for _ in 0..60 {
            if let TickOutcome::TimedOut(r) = attempt.tick() {
                result = Some(r);
            }
        }
        let result = result.expect("countdown should have timed out");

        // Before the persistence attempt resolves, the outcome is unknown.
        assert_eq!(attempt.snapshot().persisted, None);

        attempt.complete(false);

        let snapshot = attempt.snapshot();
        assert_eq!(snapshot.phase, Phase::Completed);
        assert_eq!(snapshot.persisted, Some(false));
        assert_eq!(snapshot.result.as_ref(), Some(&result));
        assert_eq!(attempt.persisted(), Some(false));
    }

    #[test]
    fn negative_time_limit_is_rejected_at_load() {
        let row = QuizRow {
            id: Uuid::new_v4(),
            title: "Broken quiz".into(),
            description: None,
            category: None,
            difficulty: None,
            questions: serde_json::json!([{
                "id": "q1",
                "prompt": "Question 1",
                "options": ["A", "B"],
                "correct_answer": 0
            }]),
            time_limit_minutes: -5,
            points: 100,
        };

        let result = QuizDefinition::from_row(row);
        assert!(matches!(result, Err(ServerError::InvariantViolation(_))));
    }

    fn lazy_pool() -> Pool<Postgres> {
        // Never connected in these tests; registry writes only happen at
        // submit time.
        Pool::<Postgres>::connect_lazy("postgres://localhost/unused").unwrap()
    }

    #[tokio::test]
    async fn registry_tracks_started_attempts() {
        let registry = AttemptRegistry::new();
        let user_id = Uuid::new_v4();

        let snapshot = registry
            .start_attempt(lazy_pool(), user_id, sample_quiz(15))
            .await
            .unwrap();

        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.remaining_seconds, 900);

        let attempt = registry.get(&snapshot.attempt_id).unwrap();
        assert_eq!(attempt.lock().await.user_id(), user_id);
    }

    #[tokio::test]
    async fn abandoned_attempt_is_dropped_and_countdown_stopped() {
        let registry = AttemptRegistry::new();

        let snapshot = registry
            .start_attempt(lazy_pool(), Uuid::new_v4(), sample_quiz(15))
            .await
            .unwrap();

        assert!(registry.abandon(&snapshot.attempt_id));
        assert!(registry.get(&snapshot.attempt_id).is_none());
        assert!(!registry.abandon(&snapshot.attempt_id));
    }
}
