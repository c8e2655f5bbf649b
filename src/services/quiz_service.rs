use crate::dto::admin_dto::{
    CreateQuestionPayload, CreateQuizPayload, UpdateQuestionPayload, UpdateQuizPayload,
};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

/// A quiz joined with its chapter and subject names, for search results.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct QuizWithContext {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub chapter_name: String,
    pub subject_name: String,
    pub date_of_quiz: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
}

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_quizzes(&self, chapter_id: Uuid) -> Result<Vec<Quiz>> {
        let chapter_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM chapters WHERE id = $1")
                .bind(chapter_id)
                .fetch_optional(&self.pool)
                .await?;
        if chapter_exists.is_none() {
            return Err(Error::NotFound("Chapter not found".to_string()));
        }
        let quizzes = sqlx::query_as::<_, Quiz>(
            "SELECT * FROM quizzes WHERE chapter_id = $1 ORDER BY date_of_quiz, start_time",
        )
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(quizzes)
    }

    pub async fn get_quiz(&self, id: Uuid) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(quiz)
    }

    pub async fn create_quiz(&self, chapter_id: Uuid, payload: CreateQuizPayload) -> Result<Quiz> {
        let chapter_exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM chapters WHERE id = $1")
                .bind(chapter_id)
                .fetch_optional(&self.pool)
                .await?;
        if chapter_exists.is_none() {
            return Err(Error::NotFound("Chapter not found".to_string()));
        }
        validate_window(payload.start_time, payload.end_time)?;

        let mut tx = self.pool.begin().await?;
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (chapter_id, date_of_quiz, start_time, end_time, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(chapter_id)
        .bind(payload.date_of_quiz)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(payload.duration_minutes)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(questions) = payload.questions {
            for q in &questions {
                sqlx::query(
                    r#"
                    INSERT INTO questions (quiz_id, statement, option1, option2, option3, option4, correct_option)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(quiz.id)
                .bind(&q.statement)
                .bind(&q.option1)
                .bind(&q.option2)
                .bind(&q.option3)
                .bind(&q.option4)
                .bind(q.correct_option)
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await?;

        Ok(quiz)
    }

    pub async fn update_quiz(&self, id: Uuid, payload: UpdateQuizPayload) -> Result<Quiz> {
        let current = self.get_quiz(id).await?;
        if let Some(chapter_id) = payload.chapter_id {
            let chapter_exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM chapters WHERE id = $1")
                    .bind(chapter_id)
                    .fetch_optional(&self.pool)
                    .await?;
            if chapter_exists.is_none() {
                return Err(Error::NotFound("Chapter not found".to_string()));
            }
        }

        let start = payload.start_time.unwrap_or(current.start_time);
        let end = payload.end_time.unwrap_or(current.end_time);
        validate_window(start, end)?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes
            SET chapter_id = COALESCE($1, chapter_id),
                date_of_quiz = COALESCE($2, date_of_quiz),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                duration_minutes = COALESCE($5, duration_minutes)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(payload.chapter_id)
        .bind(payload.date_of_quiz)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(payload.duration_minutes)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Quiz not found".to_string()));
        }
        Ok(())
    }

    /// Questions for a quiz, 404 when the quiz itself is gone.
    pub async fn list_questions(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        self.get_quiz(quiz_id).await?;
        self.questions_of(quiz_id).await
    }

    /// Questions for a quiz whose existence the caller has already checked.
    pub async fn questions_of(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let questions =
            sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE quiz_id = $1 ORDER BY id")
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(questions)
    }

    pub async fn get_question(&self, id: Uuid) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(question)
    }

    pub async fn create_question(
        &self,
        quiz_id: Uuid,
        payload: CreateQuestionPayload,
    ) -> Result<Question> {
        self.get_quiz(quiz_id).await?;
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (quiz_id, statement, option1, option2, option3, option4, correct_option)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(quiz_id)
        .bind(&payload.statement)
        .bind(&payload.option1)
        .bind(&payload.option2)
        .bind(&payload.option3)
        .bind(&payload.option4)
        .bind(payload.correct_option)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn update_question(
        &self,
        id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET statement = COALESCE($1, statement),
                option1 = COALESCE($2, option1),
                option2 = COALESCE($3, option2),
                option3 = COALESCE($4, option3),
                option4 = COALESCE($5, option4),
                correct_option = COALESCE($6, correct_option)
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&payload.statement)
        .bind(&payload.option1)
        .bind(&payload.option2)
        .bind(&payload.option3)
        .bind(&payload.option4)
        .bind(payload.correct_option)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    pub async fn search_quizzes(&self, query: &str) -> Result<Vec<QuizWithContext>> {
        let pattern = format!("%{}%", query);
        let quizzes = sqlx::query_as::<_, QuizWithContext>(
            r#"
            SELECT q.id, q.chapter_id, c.name AS chapter_name, s.name AS subject_name,
                   q.date_of_quiz, q.start_time, q.end_time, q.duration_minutes
            FROM quizzes q
            JOIN chapters c ON c.id = q.chapter_id
            JOIN subjects s ON s.id = c.subject_id
            WHERE c.name ILIKE $1 OR s.name ILIKE $1 OR q.date_of_quiz::text ILIKE $1
            ORDER BY q.date_of_quiz, q.start_time
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(quizzes)
    }

    pub async fn search_questions(&self, query: &str) -> Result<Vec<Question>> {
        let pattern = format!("%{}%", query);
        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE statement ILIKE $1 ORDER BY quiz_id",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }
}

fn validate_window(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if end <= start {
        return Err(Error::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_or_inverted_window() {
        let ten: NaiveTime = "10:00:00".parse().unwrap();
        let eleven: NaiveTime = "11:00:00".parse().unwrap();
        assert!(validate_window(ten, eleven).is_ok());
        assert!(validate_window(ten, ten).is_err());
        assert!(validate_window(eleven, ten).is_err());
    }
}
