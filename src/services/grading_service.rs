use crate::dto::user_dto::AnswerPayload;
use crate::models::question::Question;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct GradedAnswer {
    pub question_id: Uuid,
    pub selected_option: Option<i32>,
    pub correct_option: i32,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct GradeOutcome {
    pub total_score: i32,
    pub max_score: i32,
    pub details: Vec<GradedAnswer>,
}

pub struct GradingService;

impl GradingService {
    /// Grades a set of multiple-choice answers against the quiz's questions.
    /// One point per correct answer. Unanswered questions score zero;
    /// answers referencing unknown question ids are ignored. If a question
    /// was answered more than once the last answer wins.
    pub fn grade(questions: &[Question], answers: &[AnswerPayload]) -> GradeOutcome {
        let mut total_score = 0;
        let mut details = Vec::with_capacity(questions.len());

        for q in questions {
            let selected = answers
                .iter()
                .rev()
                .find(|a| a.question_id == q.id)
                .map(|a| a.selected_option);

            let is_correct = selected == Some(q.correct_option);
            if is_correct {
                total_score += 1;
            }
            details.push(GradedAnswer {
                question_id: q.id,
                selected_option: selected,
                correct_option: q.correct_option,
                is_correct,
            });
        }

        GradeOutcome {
            total_score,
            max_score: questions.len() as i32,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            statement: "What is 2 + 2?".into(),
            option1: "1".into(),
            option2: "2".into(),
            option3: "3".into(),
            option4: "4".into(),
            correct_option: correct,
        }
    }

    fn answer(question_id: Uuid, selected: i32) -> AnswerPayload {
        AnswerPayload {
            question_id,
            selected_option: selected,
        }
    }

    #[test]
    fn scores_one_point_per_correct_answer() {
        let q1 = question(4);
        let q2 = question(2);
        let q3 = question(1);
        let answers = vec![answer(q1.id, 4), answer(q2.id, 3), answer(q3.id, 1)];

        let outcome = GradingService::grade(&[q1, q2, q3], &answers);
        assert_eq!(outcome.total_score, 2);
        assert_eq!(outcome.max_score, 3);
        assert_eq!(outcome.details.len(), 3);
        assert!(outcome.details[0].is_correct);
        assert!(!outcome.details[1].is_correct);
    }

    #[test]
    fn unanswered_questions_score_zero() {
        let q1 = question(1);
        let q2 = question(2);
        let outcome = GradingService::grade(&[q1.clone(), q2], &[answer(q1.id, 1)]);
        assert_eq!(outcome.total_score, 1);
        assert_eq!(outcome.max_score, 2);
        assert_eq!(outcome.details[1].selected_option, None);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let q1 = question(1);
        let stray = answer(Uuid::new_v4(), 1);
        let outcome = GradingService::grade(&[q1.clone()], &[stray, answer(q1.id, 1)]);
        assert_eq!(outcome.total_score, 1);
        assert_eq!(outcome.max_score, 1);
    }

    #[test]
    fn last_answer_wins_on_duplicates() {
        let q1 = question(3);
        let outcome =
            GradingService::grade(&[q1.clone()], &[answer(q1.id, 3), answer(q1.id, 1)]);
        assert_eq!(outcome.total_score, 0);
        assert_eq!(outcome.details[0].selected_option, Some(1));
    }

    #[test]
    fn empty_quiz_grades_to_zero_of_zero() {
        let outcome = GradingService::grade(&[], &[]);
        assert_eq!(outcome.total_score, 0);
        assert_eq!(outcome.max_score, 0);
    }
}
