// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review, upvote and comment routes.

use super::check_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Comment, Review, ReviewFields, ReviewWithComments, UpvoteChange};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Public review routes.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/reviews", get(list_reviews))
}

/// Review routes that require authentication.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route("/api/reviews/{review_id}/upvote", post(toggle_upvote))
        .route("/api/reviews/{review_id}/comments", post(add_comment))
        .route("/api/reviews/{review_id}", delete(delete_review))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    /// Only reviews written by this user
    user_id: Option<String>,
}

/// List reviews with their comments.
async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ReviewWithComments>>> {
    if let Some(uid) = params.user_id.as_deref() {
        check_id(uid)?;
    }

    let reviews = state
        .review_service
        .fetch_reviews_with_comments(params.user_id.as_deref())
        .await?;

    Ok(Json(reviews))
}

// ─── Create ──────────────────────────────────────────────────

/// Create a review authored by the caller.
async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(fields), _): WithRejection<Json<ReviewFields>, AppError>,
) -> Result<(StatusCode, Json<Review>)> {
    let review = state
        .review_service
        .create_review(&user.uid, user.display_name.as_deref(), fields)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

// ─── Upvotes ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpvoteResponse {
    pub review_id: String,
    pub upvotes: u32,
    /// Whether the caller's upvote is now present
    pub upvoted: bool,
}

/// Toggle the caller's upvote.
async fn toggle_upvote(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<String>,
) -> Result<Json<UpvoteResponse>> {
    check_id(&review_id)?;

    let outcome = state
        .review_service
        .toggle_upvote(&review_id, &user.uid)
        .await?;

    Ok(Json(UpvoteResponse {
        review_id,
        upvotes: outcome.upvotes,
        upvoted: outcome.change == UpvoteChange::Added,
    }))
}

// ─── Comments ────────────────────────────────────────────────

#[derive(Deserialize)]
struct CommentRequest {
    content: String,
}

/// Add a comment to a review.
async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<CommentRequest>, AppError>,
) -> Result<(StatusCode, Json<Comment>)> {
    check_id(&review_id)?;

    let comment = state
        .review_service
        .add_comment(
            &review_id,
            &user.uid,
            user.display_name.as_deref(),
            &body.content,
        )
        .await?
        .ok_or_else(|| AppError::BadRequest("Comment content cannot be empty".to_string()))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

// ─── Delete ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteReviewResponse {
    pub success: bool,
    pub comments_deleted: usize,
}

/// Delete one of the caller's reviews and its comments.
async fn delete_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(review_id): Path<String>,
) -> Result<Json<DeleteReviewResponse>> {
    check_id(&review_id)?;

    let comments_deleted = state
        .review_service
        .delete_review(&review_id, &user.uid)
        .await?;

    Ok(Json(DeleteReviewResponse {
        success: true,
        comments_deleted,
    }))
}
