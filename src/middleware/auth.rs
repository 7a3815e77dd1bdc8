// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "bookbay_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity provider user ID)
    pub sub: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// The caller of an optionally-authenticated route.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<AuthUser>);

impl Viewer {
    pub fn uid(&self) -> Option<&str> {
        self.0.as_ref().map(|u| u.uid.as_str())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<AuthUser>().cloned()))
    }
}

/// Pull the token from the session cookie, falling back to the bearer header.
fn extract_token(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Verify a session token and build the user it names.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Option<AuthUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(token, &key, &validation).ok()?.claims;
    if claims.sub.trim().is_empty() {
        return None;
    }

    Some(AuthUser {
        uid: claims.sub,
        display_name: claims.name,
        photo_url: claims.picture,
    })
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, &request).ok_or(AppError::Unauthorized)?;
    let auth_user =
        verify_jwt(&token, &state.config.jwt_signing_key).ok_or(AppError::InvalidToken)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Middleware that attaches the user when a valid token is present.
///
/// Missing or invalid tokens leave the request anonymous.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = extract_token(&jar, &request)
        .and_then(|token| verify_jwt(&token, &state.config.jwt_signing_key))
    {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Create a JWT for a user session.
///
/// Tokens are normally minted by the identity provider; this exists for
/// local development and tests.
pub fn create_jwt(
    uid: &str,
    display_name: Option<&str>,
    signing_key: &[u8],
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: uid.to_string(),
        name: display_name.map(str::to_string),
        picture: None,
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
