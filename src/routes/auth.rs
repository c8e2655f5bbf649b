use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::{Error, Result};
use crate::utils::token::issue_token;
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.register(payload).await?;
    tracing::info!(username = %user.username, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    // A single generic message for every failure mode; no account probing.
    let invalid = || Error::Unauthorized("Invalid username or password".to_string());

    let response = match payload.user_type.as_str() {
        "admin" => {
            let admin = state
                .user_service
                .authenticate_admin(&payload.username, &payload.password)
                .await?
                .ok_or_else(invalid)?;
            LoginResponse {
                token: issue_token(admin.id, "admin")?,
                role: "admin".to_string(),
                account_id: admin.id,
                username: admin.username,
            }
        }
        "user" => {
            let user = state
                .user_service
                .authenticate_user(&payload.username, &payload.password)
                .await?
                .ok_or_else(invalid)?;
            LoginResponse {
                token: issue_token(user.id, "user")?,
                role: "user".to_string(),
                account_id: user.id,
                username: user.username,
            }
        }
        other => {
            return Err(Error::BadRequest(format!(
                "Unknown user_type: {}",
                other
            )))
        }
    };

    Ok(Json(response))
}
