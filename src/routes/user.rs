use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::SubmitQuizRequest;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::utils::time::now_naive;
use crate::AppState;

fn claims_user_id(claims: &Claims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| Error::Unauthorized("invalid_token".to_string()))
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims_user_id(&claims)?;
    let user = state.user_service.get_user(user_id).await?;
    let stats = state.stats_service.user_dashboard(user_id).await?;
    Ok(Json(json!({
        "user": user,
        "stats": stats,
    })))
}

#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let catalog = state.attempt_service.quiz_catalog(now_naive()).await?;
    Ok(Json(catalog))
}

#[axum::debug_handler]
pub async fn take_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.attempt_service.take_quiz(quiz_id, now_naive()).await?;
    Ok(Json(quiz))
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims_user_id(&claims)?;
    let result = state
        .attempt_service
        .submit_quiz(quiz_id, user_id, &payload.answers, now_naive())
        .await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn my_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims_user_id(&claims)?;
    let history = state.score_service.user_history(user_id).await?;
    Ok(Json(history))
}
