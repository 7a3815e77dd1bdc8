// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! `Store` is the persistence seam used by the services. Production runs
//! on Firestore; the in-memory backend serves local development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Comment, ProfileUpdate, Review, UpvoteChange, UserProfile};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const REVIEWS: &str = "reviews";
    pub const COMMENTS: &str = "comments";
    pub const USERS: &str = "users";
}

/// Outcome of an atomic upvote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpvoteOutcome {
    pub change: UpvoteChange,
    pub upvotes: u32,
}

/// Document store operations.
///
/// Methods returning `Option` yield `None` when the addressed document
/// does not exist.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Reviews ─────────────────────────────────────────────────

    async fn insert_review(&self, review: &Review) -> Result<(), AppError>;

    async fn get_review(&self, review_id: &str) -> Result<Option<Review>, AppError>;

    /// List reviews, optionally only those written by `user_id`.
    async fn list_reviews(&self, user_id: Option<&str>) -> Result<Vec<Review>, AppError>;

    /// Toggle `user_id`'s upvote against the stored document, atomically.
    async fn toggle_upvote(
        &self,
        review_id: &str,
        user_id: &str,
    ) -> Result<Option<UpvoteOutcome>, AppError>;

    async fn delete_review(&self, review_id: &str) -> Result<(), AppError>;

    // ─── Comments ────────────────────────────────────────────────

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError>;

    async fn comments_for_review(&self, review_id: &str) -> Result<Vec<Comment>, AppError>;

    /// Delete comments by ID. Not atomic across the whole set.
    async fn delete_comments(&self, comment_ids: &[String]) -> Result<(), AppError>;

    // ─── Profiles ────────────────────────────────────────────────

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// Create the profile unless one already exists; returns the stored one.
    async fn create_profile_if_missing(
        &self,
        profile: &UserProfile,
    ) -> Result<UserProfile, AppError>;

    /// Atomically apply a partial edit to an existing profile.
    async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError>;

    /// Add each user to the other's connections in one atomic write.
    ///
    /// Returns false (writing nothing) if either profile is missing.
    async fn connect(&self, uid_a: &str, uid_b: &str) -> Result<bool, AppError>;
}
