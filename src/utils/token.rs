use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

/// Issues a signed bearer token for an authenticated principal. The role is
/// what the auth middleware gates on.
pub fn issue_token(subject: Uuid, role: &str) -> Result<String> {
    let config = crate::config::get_config();
    let expires_at = Utc::now() + Duration::hours(config.token_ttl_hours);
    let claims = Claims {
        sub: subject.to_string(),
        exp: expires_at.timestamp() as usize,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}
