//! services/api/src/web/token.rs
//!
//! Issues and verifies the bearer tokens handed out at signup and login.
//! Tokens are HS256 JWTs whose subject is the user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encode(String),
    #[error("token is invalid or expired")]
    Invalid,
}

/// Signs a token for `user_id` that expires `ttl_hours` from now.
pub fn issue_token(user_id: Uuid, secret: &str, ttl_hours: i64) -> Result<String, TokenError> {
    let exp = Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| TokenError::Encode("token expiry overflow".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encode(e.to_string()))
}

/// Checks the signature and expiry of `token` and returns the user id it carries.
pub fn verify_token(token: &str, secret: &str) -> Result<Uuid, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| TokenError::Invalid)?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)
}
