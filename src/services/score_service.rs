use crate::dto::admin_dto::{CreateScorePayload, ScoreView, UpdateScorePayload};
use crate::dto::user_dto::ScoreHistoryEntry;
use crate::error::{Error, Result};
use crate::models::score::{percentage, Score};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ScoreService {
    pool: PgPool,
}

impl ScoreService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_scores(
        &self,
        user_id: Option<Uuid>,
        quiz_id: Option<Uuid>,
    ) -> Result<Vec<ScoreView>> {
        let scores = sqlx::query_as::<_, Score>(
            r#"
            SELECT * FROM scores
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR quiz_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(scores.into_iter().map(ScoreView::from).collect())
    }

    pub async fn get_score(&self, id: Uuid) -> Result<ScoreView> {
        let score = sqlx::query_as::<_, Score>("SELECT * FROM scores WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(score.into())
    }

    pub async fn create_score(&self, payload: CreateScorePayload) -> Result<ScoreView> {
        let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(payload.user_id)
            .fetch_optional(&self.pool)
            .await?;
        if user_exists.is_none() {
            return Err(Error::NotFound("User not found".to_string()));
        }
        let quiz_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM quizzes WHERE id = $1")
            .bind(payload.quiz_id)
            .fetch_optional(&self.pool)
            .await?;
        if quiz_exists.is_none() {
            return Err(Error::NotFound("Quiz not found".to_string()));
        }

        let score = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scores (quiz_id, user_id, total_score, max_score)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(payload.quiz_id)
        .bind(payload.user_id)
        .bind(payload.total_score)
        .bind(payload.max_score)
        .fetch_one(&self.pool)
        .await?;
        Ok(score.into())
    }

    pub async fn update_score(&self, id: Uuid, payload: UpdateScorePayload) -> Result<ScoreView> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            UPDATE scores
            SET total_score = COALESCE($1, total_score),
                max_score = COALESCE($2, max_score)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(payload.total_score)
        .bind(payload.max_score)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(score.into())
    }

    pub async fn delete_score(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM scores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Score not found".to_string()));
        }
        Ok(())
    }

    /// A user's score history with quiz context, newest first.
    pub async fn user_history(&self, user_id: Uuid) -> Result<Vec<ScoreHistoryEntry>> {
        #[derive(sqlx::FromRow)]
        struct Row {
            score_id: Uuid,
            quiz_id: Uuid,
            subject_name: String,
            chapter_name: String,
            date_of_quiz: NaiveDate,
            total_score: i32,
            max_score: i32,
            taken_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT sc.id AS score_id, sc.quiz_id, s.name AS subject_name,
                   c.name AS chapter_name, q.date_of_quiz,
                   sc.total_score, sc.max_score, sc.created_at AS taken_at
            FROM scores sc
            JOIN quizzes q ON q.id = sc.quiz_id
            JOIN chapters c ON c.id = q.chapter_id
            JOIN subjects s ON s.id = c.subject_id
            WHERE sc.user_id = $1
            ORDER BY sc.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ScoreHistoryEntry {
                score_id: r.score_id,
                quiz_id: r.quiz_id,
                subject_name: r.subject_name,
                chapter_name: r.chapter_name,
                date_of_quiz: r.date_of_quiz,
                total_score: r.total_score,
                max_score: r.max_score,
                percentage: percentage(r.total_score, r.max_score),
                taken_at: r.taken_at,
            })
            .collect())
    }
}
