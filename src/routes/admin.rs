use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{
    CreateChapterPayload, CreateQuestionPayload, CreateQuizPayload, CreateScorePayload,
    CreateSubjectPayload, UpdateChapterPayload, UpdateQuestionPayload, UpdateQuizPayload,
    UpdateScorePayload, UpdateSubjectPayload,
};
use crate::error::{Error, Result};
use crate::AppState;

const SEARCH_SNIPPET_LEN: usize = 50;

#[axum::debug_handler]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let dashboard = state.stats_service.admin_dashboard().await?;
    Ok(Json(dashboard))
}

// --- Subjects ---

#[axum::debug_handler]
pub async fn list_subjects(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let subjects = state.subject_service.list_subjects().await?;
    Ok(Json(subjects))
}

#[axum::debug_handler]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let subject = state.subject_service.get_subject(id).await?;
    Ok(Json(subject))
}

#[axum::debug_handler]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let subject = state.subject_service.create_subject(payload).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[axum::debug_handler]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubjectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let subject = state.subject_service.update_subject(id, payload).await?;
    Ok(Json(subject))
}

#[axum::debug_handler]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.subject_service.delete_subject(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Chapters ---

#[axum::debug_handler]
pub async fn list_chapters(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let chapters = state.subject_service.list_chapters(subject_id).await?;
    Ok(Json(chapters))
}

#[axum::debug_handler]
pub async fn create_chapter(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
    Json(payload): Json<CreateChapterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let chapter = state
        .subject_service
        .create_chapter(subject_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(chapter)))
}

#[axum::debug_handler]
pub async fn get_chapter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let chapter = state.subject_service.get_chapter(id).await?;
    Ok(Json(chapter))
}

#[axum::debug_handler]
pub async fn update_chapter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateChapterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let chapter = state.subject_service.update_chapter(id, payload).await?;
    Ok(Json(chapter))
}

#[axum::debug_handler]
pub async fn delete_chapter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.subject_service.delete_chapter(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Quizzes ---

#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Path(chapter_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quizzes = state.quiz_service.list_quizzes(chapter_id).await?;
    Ok(Json(quizzes))
}

#[axum::debug_handler]
pub async fn chapter_quiz_stats(
    State(state): State<AppState>,
    Path(chapter_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let stats = state.stats_service.chapter_quiz_stats(chapter_id).await?;
    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Path(chapter_id): Path<Uuid>,
    Json(payload): Json<CreateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.create_quiz(chapter_id, payload).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.get_quiz(id).await?;
    let questions = state.quiz_service.questions_of(id).await?;
    Ok(Json(json!({
        "id": quiz.id,
        "chapter_id": quiz.chapter_id,
        "date_of_quiz": quiz.date_of_quiz,
        "start_time": quiz.start_time,
        "end_time": quiz.end_time,
        "duration_minutes": quiz.duration_minutes,
        "questions": questions,
    })))
}

#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.update_quiz(id, payload).await?;
    Ok(Json(quiz))
}

#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_quiz(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Questions ---

#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let questions = state.quiz_service.list_questions(quiz_id).await?;
    Ok(Json(questions))
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.quiz_service.create_question(quiz_id, payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let question = state.quiz_service.get_question(id).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.quiz_service.update_question(id, payload).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Users ---

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_user(id).await?;
    let history = state.score_service.user_history(id).await?;
    Ok(Json(json!({
        "user": user,
        "scores": history,
    })))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Scores ---

#[derive(Debug, serde::Deserialize, Default)]
#[serde(default)]
pub struct ListScoresQuery {
    pub user_id: Option<Uuid>,
    pub quiz_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn list_scores(
    State(state): State<AppState>,
    Query(query): Query<ListScoresQuery>,
) -> Result<impl IntoResponse> {
    let scores = state
        .score_service
        .list_scores(query.user_id, query.quiz_id)
        .await?;
    Ok(Json(scores))
}

#[axum::debug_handler]
pub async fn get_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let score = state.score_service.get_score(id).await?;
    Ok(Json(score))
}

#[axum::debug_handler]
pub async fn create_score(
    State(state): State<AppState>,
    Json(payload): Json<CreateScorePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let score = state.score_service.create_score(payload).await?;
    Ok((StatusCode::CREATED, Json(score)))
}

#[axum::debug_handler]
pub async fn update_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScorePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let score = state.score_service.update_score(id, payload).await?;
    Ok(Json(score))
}

#[axum::debug_handler]
pub async fn delete_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.score_service.delete_score(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Search ---

#[derive(Debug, serde::Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub query: String,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(Error::BadRequest("Please enter a search query".to_string()));
    }
    let search_type = params.search_type.as_deref().unwrap_or("all");
    let known = ["all", "users", "subjects", "chapters", "quizzes", "questions"];
    if !known.contains(&search_type) {
        return Err(Error::BadRequest(format!(
            "Unknown search type: {}",
            search_type
        )));
    }

    let mut results = serde_json::Map::new();

    if matches!(search_type, "all" | "users") {
        let users = state.user_service.search_users(query).await?;
        let users: Vec<JsonValue> = users
            .iter()
            .map(|u| {
                json!({
                    "id": u.id,
                    "username": u.username,
                    "email": u.email,
                    "full_name": u.full_name,
                })
            })
            .collect();
        results.insert("users".to_string(), json!(users));
    }

    if matches!(search_type, "all" | "subjects") {
        let subjects = state.subject_service.search_subjects(query).await?;
        results.insert("subjects".to_string(), json!(subjects));
    }

    if matches!(search_type, "all" | "chapters") {
        let chapters = state.subject_service.search_chapters(query).await?;
        results.insert("chapters".to_string(), json!(chapters));
    }

    if matches!(search_type, "all" | "quizzes") {
        let quizzes = state.quiz_service.search_quizzes(query).await?;
        results.insert("quizzes".to_string(), json!(quizzes));
    }

    if matches!(search_type, "all" | "questions") {
        let questions = state.quiz_service.search_questions(query).await?;
        let questions: Vec<JsonValue> = questions
            .iter()
            .map(|q| {
                json!({
                    "id": q.id,
                    "quiz_id": q.quiz_id,
                    "statement": truncate_snippet(&q.statement, SEARCH_SNIPPET_LEN),
                })
            })
            .collect();
        results.insert("questions".to_string(), json!(questions));
    }

    Ok(Json(json!({
        "query": query,
        "results": results,
    })))
}

fn truncate_snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_untouched_when_short() {
        assert_eq!(truncate_snippet("short", 50), "short");
    }

    #[test]
    fn snippet_is_cut_with_ellipsis() {
        let long = "x".repeat(60);
        let cut = truncate_snippet(&long, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
    }
}
