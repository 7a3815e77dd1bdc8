// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and connection routes.

use super::check_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, Viewer};
use crate::models::{ProfileUpdate, UserProfile};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes where authentication is optional.
pub fn optional_auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/{uid}", get(get_profile))
}

/// Routes that require authentication.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/users/{uid}/connect", post(connect))
}

async fn own_profile(state: &AppState, user: &AuthUser) -> Result<UserProfile> {
    state
        .profile_service
        .get_or_create_own_profile(
            &user.uid,
            user.display_name.as_deref(),
            user.photo_url.as_deref(),
        )
        .await
}

/// Get the caller's profile, creating it on first visit.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = own_profile(&state, &user).await?;
    Ok(Json(profile))
}

/// Edit the caller's profile.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(update), _): WithRejection<Json<ProfileUpdate>, AppError>,
) -> Result<Json<UserProfile>> {
    // Make sure there is something to update.
    own_profile(&state, &user).await?;

    let profile = state
        .profile_service
        .update_own_profile(&user.uid, update)
        .await?;
    Ok(Json(profile))
}

/// View another user's profile if it is public (or the caller's own).
async fn get_profile(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>> {
    check_id(&uid)?;

    let profile = state.profile_service.get_profile(viewer.uid(), &uid).await?;
    Ok(Json(profile))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ConnectResponse {
    pub success: bool,
    pub message: String,
}

/// Connect the caller with another user.
async fn connect(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(uid): Path<String>,
) -> Result<Json<ConnectResponse>> {
    check_id(&uid)?;

    own_profile(&state, &user).await?;
    state.profile_service.connect(&user.uid, &uid).await?;

    Ok(Json(ConnectResponse {
        success: true,
        message: "Connected. You're now in each other's network.".to_string(),
    }))
}
