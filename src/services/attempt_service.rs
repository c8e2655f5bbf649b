use crate::dto::user_dto::{
    AnswerPayload, QuizCatalogEntry, SubmitQuizResponse, TakeQuestion, TakeQuizResponse,
};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::quiz::{Quiz, QuizAvailability};
use crate::services::grading_service::GradingService;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
struct CatalogRow {
    id: Uuid,
    chapter_id: Uuid,
    chapter_name: String,
    subject_id: Uuid,
    subject_name: String,
    date_of_quiz: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
    question_count: i64,
}

#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every quiz with chapter/subject context and its availability state at
    /// `now`, ordered soonest first.
    pub async fn quiz_catalog(&self, now: NaiveDateTime) -> Result<Vec<QuizCatalogEntry>> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT q.id, q.chapter_id, c.name AS chapter_name,
                   s.id AS subject_id, s.name AS subject_name,
                   q.date_of_quiz, q.start_time, q.end_time, q.duration_minutes,
                   (SELECT COUNT(*) FROM questions qq WHERE qq.quiz_id = q.id) AS question_count
            FROM quizzes q
            JOIN chapters c ON c.id = q.chapter_id
            JOIN subjects s ON s.id = c.subject_id
            ORDER BY q.date_of_quiz, q.start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let quiz = Quiz {
                    id: r.id,
                    chapter_id: r.chapter_id,
                    date_of_quiz: r.date_of_quiz,
                    start_time: r.start_time,
                    end_time: r.end_time,
                    duration_minutes: r.duration_minutes,
                };
                let availability = quiz.availability(now);
                QuizCatalogEntry {
                    id: r.id,
                    chapter_id: r.chapter_id,
                    chapter_name: r.chapter_name,
                    subject_id: r.subject_id,
                    subject_name: r.subject_name,
                    date_of_quiz: r.date_of_quiz,
                    start_time: r.start_time,
                    end_time: r.end_time,
                    duration_minutes: r.duration_minutes,
                    question_count: r.question_count,
                    availability,
                }
            })
            .collect())
    }

    /// The quiz as presented to a taker: questions with the correct answers
    /// stripped. Fails unless the quiz window is open at `now`.
    pub async fn take_quiz(&self, quiz_id: Uuid, now: NaiveDateTime) -> Result<TakeQuizResponse> {
        let (quiz, chapter_name, subject_name) = self.quiz_with_context(quiz_id).await?;
        ensure_open(&quiz, now)?;

        let questions =
            sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE quiz_id = $1 ORDER BY id")
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(TakeQuizResponse {
            quiz_id: quiz.id,
            chapter_name,
            subject_name,
            duration_minutes: quiz.duration_minutes,
            end_time: quiz.end_time,
            questions: questions
                .into_iter()
                .map(|q| TakeQuestion {
                    id: q.id,
                    statement: q.statement,
                    option1: q.option1,
                    option2: q.option2,
                    option3: q.option3,
                    option4: q.option4,
                })
                .collect(),
        })
    }

    /// Grades a submission and records the score. Submissions outside the
    /// availability window are rejected; repeat submissions append new rows.
    pub async fn submit_quiz(
        &self,
        quiz_id: Uuid,
        user_id: Uuid,
        answers: &[AnswerPayload],
        now: NaiveDateTime,
    ) -> Result<SubmitQuizResponse> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;
        ensure_open(&quiz, now)?;

        let questions =
            sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE quiz_id = $1 ORDER BY id")
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?;

        let outcome = GradingService::grade(&questions, answers);

        let (score_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO scores (quiz_id, user_id, total_score, max_score)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(quiz_id)
        .bind(user_id)
        .bind(outcome.total_score)
        .bind(outcome.max_score)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            %quiz_id,
            %user_id,
            total = outcome.total_score,
            max = outcome.max_score,
            "Quiz submission graded"
        );

        Ok(SubmitQuizResponse {
            score_id,
            quiz_id,
            total_score: outcome.total_score,
            max_score: outcome.max_score,
            percentage: crate::models::score::percentage(outcome.total_score, outcome.max_score),
        })
    }

    async fn quiz_with_context(&self, quiz_id: Uuid) -> Result<(Quiz, String, String)> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: Uuid,
            chapter_id: Uuid,
            date_of_quiz: NaiveDate,
            start_time: NaiveTime,
            end_time: NaiveTime,
            duration_minutes: i32,
            chapter_name: String,
            subject_name: String,
        }

        let row = sqlx::query_as::<_, Row>(
            r#"
            SELECT q.id, q.chapter_id, q.date_of_quiz, q.start_time, q.end_time,
                   q.duration_minutes, c.name AS chapter_name, s.name AS subject_name
            FROM quizzes q
            JOIN chapters c ON c.id = q.chapter_id
            JOIN subjects s ON s.id = c.subject_id
            WHERE q.id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        let quiz = Quiz {
            id: row.id,
            chapter_id: row.chapter_id,
            date_of_quiz: row.date_of_quiz,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
        };
        Ok((quiz, row.chapter_name, row.subject_name))
    }
}

fn ensure_open(quiz: &Quiz, now: NaiveDateTime) -> Result<()> {
    match quiz.availability(now) {
        QuizAvailability::Open => Ok(()),
        QuizAvailability::Upcoming => Err(Error::Forbidden("quiz_not_open".to_string())),
        QuizAvailability::Closed => Err(Error::Forbidden("quiz_closed".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_open_maps_availability_to_errors() {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            chapter_id: Uuid::new_v4(),
            date_of_quiz: "2026-05-01".parse().unwrap(),
            start_time: "09:00:00".parse().unwrap(),
            end_time: "10:00:00".parse().unwrap(),
            duration_minutes: 45,
        };

        let before: NaiveDateTime = "2026-05-01T08:00:00".parse().unwrap();
        let during: NaiveDateTime = "2026-05-01T09:30:00".parse().unwrap();
        let after: NaiveDateTime = "2026-05-01T10:30:00".parse().unwrap();

        assert!(matches!(
            ensure_open(&quiz, before),
            Err(Error::Forbidden(msg)) if msg == "quiz_not_open"
        ));
        assert!(ensure_open(&quiz, during).is_ok());
        assert!(matches!(
            ensure_open(&quiz, after),
            Err(Error::Forbidden(msg)) if msg == "quiz_closed"
        ));
    }
}
