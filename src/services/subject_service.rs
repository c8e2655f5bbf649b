use crate::dto::admin_dto::{
    CreateChapterPayload, CreateSubjectPayload, UpdateChapterPayload, UpdateSubjectPayload,
};
use crate::error::{Error, Result};
use crate::models::subject::{Chapter, Subject};
use sqlx::PgPool;
use uuid::Uuid;

/// A chapter joined with its subject's name, for search results.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ChapterWithSubject {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct SubjectService {
    pool: PgPool,
}

impl SubjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(subjects)
    }

    pub async fn get_subject(&self, id: Uuid) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(subject)
    }

    pub async fn create_subject(&self, payload: CreateSubjectPayload) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(subject)
    }

    pub async fn update_subject(&self, id: Uuid, payload: UpdateSubjectPayload) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = COALESCE($1, name),
                description = COALESCE($2, description)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(subject)
    }

    pub async fn delete_subject(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Subject not found".to_string()));
        }
        Ok(())
    }

    pub async fn list_chapters(&self, subject_id: Uuid) -> Result<Vec<Chapter>> {
        // 404 when the parent subject is gone, not an empty list.
        self.get_subject(subject_id).await?;
        let chapters =
            sqlx::query_as::<_, Chapter>("SELECT * FROM chapters WHERE subject_id = $1 ORDER BY name")
                .bind(subject_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(chapters)
    }

    pub async fn get_chapter(&self, id: Uuid) -> Result<Chapter> {
        let chapter = sqlx::query_as::<_, Chapter>("SELECT * FROM chapters WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(chapter)
    }

    pub async fn create_chapter(
        &self,
        subject_id: Uuid,
        payload: CreateChapterPayload,
    ) -> Result<Chapter> {
        self.get_subject(subject_id).await?;
        let chapter = sqlx::query_as::<_, Chapter>(
            "INSERT INTO chapters (subject_id, name, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(subject_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(chapter)
    }

    pub async fn update_chapter(&self, id: Uuid, payload: UpdateChapterPayload) -> Result<Chapter> {
        if let Some(subject_id) = payload.subject_id {
            self.get_subject(subject_id).await?;
        }
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            UPDATE chapters
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                subject_id = COALESCE($3, subject_id)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.subject_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(chapter)
    }

    pub async fn delete_chapter(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Chapter not found".to_string()));
        }
        Ok(())
    }

    pub async fn search_subjects(&self, query: &str) -> Result<Vec<Subject>> {
        let pattern = format!("%{}%", query);
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT * FROM subjects WHERE name ILIKE $1 OR description ILIKE $1 ORDER BY name",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    pub async fn search_chapters(&self, query: &str) -> Result<Vec<ChapterWithSubject>> {
        let pattern = format!("%{}%", query);
        let chapters = sqlx::query_as::<_, ChapterWithSubject>(
            r#"
            SELECT c.id, c.subject_id, s.name AS subject_name, c.name, c.description
            FROM chapters c
            JOIN subjects s ON s.id = c.subject_id
            WHERE c.name ILIKE $1 OR c.description ILIKE $1
            ORDER BY c.name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(chapters)
    }
}
