use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

fn extract_bearer(req: &Request) -> Result<&str, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response());
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"bad_authorization"})),
        )
            .into_response());
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response());
    };
    Ok(token)
}

fn decode_claims(token: &str) -> Result<Claims, Response> {
    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_token"})),
        )
            .into_response()
    })
}

async fn require_role(mut req: Request, next: Next, allowed: &[&str]) -> Response {
    let token = match extract_bearer(&req) {
        Ok(t) => t.to_string(),
        Err(resp) => return resp,
    };
    match decode_claims(&token) {
        Ok(claims) => {
            let role = claims.role.clone().unwrap_or_default();
            if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
                return (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    require_role(req, next, &["admin"]).await
}

pub async fn require_user(req: Request, next: Next) -> Response {
    require_role(req, next, &["user"]).await
}
