//! Token handling for the `x-auth-token` header.
//!
//! Signin and account storage live elsewhere; this layer only verifies the
//! HS256 token a caller presents and exposes the subject to handlers through
//! the [`AuthUser`] and [`AdminUser`] extractors.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

pub const TOKEN_HEADER: &str = "x-auth-token";
pub const ADMIN_ROLE: &str = "admin";

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

pub fn issue_token(user_id: &str, role: &str, key: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
    .expect("token encoding cannot fail with an HS256 key")
}

pub fn decode_token(token: &str, key: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Auth)
}

fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    let token = parts
        .headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Auth)?;

    decode_token(token, &state.config.auth_key)
}

/// Any authenticated caller. Carries the user id.
pub struct AuthUser(pub String);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;

        Ok(AuthUser(claims.sub))
    }
}

/// A caller whose token carries the admin role.
pub struct AdminUser(pub String);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::Auth);
        }

        Ok(AdminUser(claims.sub))
    }
}
