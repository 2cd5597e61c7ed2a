#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::quiz::{
        models::{Phase, Question, QuizDefinition},
        session::QuizAttempt,
    };

    fn quiz_with_key(key: &[usize], points: i32) -> Arc<QuizDefinition> {
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
            title: "Scored quiz".into(),
            description: None,
            category: None,
            difficulty: None,
            questions,
            time_limit_minutes: 15,
            points,
        })
    }

    fn submit_with_answers(
        definition: Arc<QuizDefinition>,
        answers: &[(usize, usize)],
    ) -> crate::quiz::models::AttemptResult {
        let mut attempt = QuizAttempt::new(Uuid::new_v4(), definition);
        attempt.start().unwrap();

        for (question_index, option_index) in answers {
            attempt.select_answer(*question_index, *option_index).unwrap();
        }

        let result = attempt.submit().unwrap();
        assert_eq!(attempt.phase(), Phase::Submitting);
        result
    }

    #[test]
    fn four_of_five_correct_awards_full_points() {
        let definition = quiz_with_key(&[0, 1, 1, 0, 1], 100);
        let answers = [(0, 0), (1, 1), (2, 2), (3, 0), (4, 1)];

        let result = submit_with_answers(definition, &answers);

        assert_eq!(result.total_questions, 5);
        assert_eq!(result.correct_answers, 4);
        assert_eq!(result.percentage, 80);
        assert_eq!(result.awarded_points, 100);
    }

    #[test]
    fn two_of_five_correct_awards_nothing() {
        let definition = quiz_with_key(&[0, 1, 1, 0, 1], 100);
        let answers = [(0, 0), (1, 1), (2, 0), (3, 2), (4, 3)];

        let result = submit_with_answers(definition, &answers);

        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.percentage, 40);
        assert_eq!(result.awarded_points, 0);
    }

    #[test]
    fn unanswered_questions_score_as_incorrect() {
        let definition = quiz_with_key(&[0, 1, 1, 0, 1], 100);

        let result = submit_with_answers(definition, &[(0, 0)]);

        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.percentage, 20);
        assert_eq!(result.awarded_points, 0);
    }

    #[test]
    fn no_answers_scores_zero() {
        let definition = quiz_with_key(&[0, 1, 1, 0, 1], 100);

        let result = submit_with_answers(definition, &[]);

        assert_eq!(result.correct_answers, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.awarded_points, 0);
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        let definition = quiz_with_key(&[0, 1, 1], 30);
        let result = submit_with_answers(definition, &[(0, 0)]);
        // 1 of 3 -> 33.33 rounds down.
        assert_eq!(result.percentage, 33);

        let definition = quiz_with_key(&[0, 1, 1], 30);
        let result = submit_with_answers(definition, &[(0, 0), (1, 1)]);
        // 2 of 3 -> 66.67 rounds up.
        assert_eq!(result.percentage, 67);
    }

    #[test]
    fn seventy_percent_is_the_pass_boundary() {
        let key = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

        // 7 of 10 meets the threshold exactly.
        let definition = quiz_with_key(&key, 50);
        let seven_correct: Vec<(usize, usize)> = (0..7)
            .map(|i| (i, 0))
            .chain((7..10).map(|i| (i, 1)))
            .collect();
        let result = submit_with_answers(definition, &seven_correct);
        assert_eq!(result.percentage, 70);
        assert_eq!(result.awarded_points, 50);

        // 6 of 10 falls short.
        let definition = quiz_with_key(&key, 50);
        let six_correct: Vec<(usize, usize)> = (0..6)
            .map(|i| (i, 0))
            .chain((6..10).map(|i| (i, 1)))
            .collect();
        let result = submit_with_answers(definition, &six_correct);
        assert_eq!(result.percentage, 60);
        assert_eq!(result.awarded_points, 0);
    }
}
