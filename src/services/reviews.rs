// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review interaction service.
//!
//! Handles the review workflow:
//! 1. Create reviews for the signed-in author
//! 2. Toggle upvotes (atomic in the store)
//! 3. Attach comments with random flavor tags
//! 4. Delete a review and cascade to its comments
//! 5. List reviews with comments attached

use crate::db::{Store, UpvoteOutcome};
use crate::error::{AppError, Result};
use crate::models::comment::MAX_COMMENT_LENGTH;
use crate::models::{Comment, FlavorTags, Review, ReviewFields, ReviewWithComments};
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use validator::Validate;

const MAX_CONCURRENT_DB_OPS: usize = 50;

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn Store>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Store a new review with zero upvotes.
    pub async fn create_review(
        &self,
        author_id: &str,
        author_name: Option<&str>,
        fields: ReviewFields,
    ) -> Result<Review> {
        let fields = fields.trimmed();
        fields.validate()?;

        let review = Review::new(author_id, author_name, fields);
        self.store.insert_review(&review).await?;

        tracing::info!(
            review_id = %review.id,
            user_id = author_id,
            book_title = %review.book_title,
            "Review created"
        );

        Ok(review)
    }

    /// Toggle `user_id`'s upvote on a review.
    pub async fn toggle_upvote(&self, review_id: &str, user_id: &str) -> Result<UpvoteOutcome> {
        let outcome = self
            .store
            .toggle_upvote(review_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))?;

        tracing::debug!(
            review_id,
            user_id,
            change = ?outcome.change,
            upvotes = outcome.upvotes,
            "Upvote toggled"
        );

        Ok(outcome)
    }

    /// Add a comment to a review.
    ///
    /// Blank content is a no-op and returns `Ok(None)`.
    pub async fn add_comment(
        &self,
        review_id: &str,
        user_id: &str,
        author_name: Option<&str>,
        content: &str,
    ) -> Result<Option<Comment>> {
        let content = content.trim();
        if content.is_empty() {
            tracing::debug!(review_id, user_id, "Ignoring blank comment");
            return Ok(None);
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Comment content exceeds maximum length of {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        if self.store.get_review(review_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Review {} not found", review_id)));
        }

        let author_name = author_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(crate::models::review::ANONYMOUS_AUTHOR);
        let tags = FlavorTags::roll(&mut rand::thread_rng());
        let comment = Comment::new(review_id, user_id, author_name, content.to_string(), tags);

        self.store.insert_comment(&comment).await?;

        tracing::info!(
            review_id,
            comment_id = %comment.id,
            user_id,
            "Comment added"
        );

        Ok(Some(comment))
    }

    /// Delete a review and all of its comments.
    ///
    /// Only the author may delete. Comments go first, then the review; a
    /// failure part way through is not rolled back. Returns the number of
    /// comments removed.
    pub async fn delete_review(&self, review_id: &str, requester_id: &str) -> Result<usize> {
        let review = self
            .store
            .get_review(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))?;

        if review.user_id != requester_id {
            tracing::warn!(
                review_id,
                requester_id,
                author_id = %review.user_id,
                "Rejected review deletion by non-author"
            );
            return Err(AppError::Forbidden(
                "Only the author can delete this review".to_string(),
            ));
        }

        let comment_ids: Vec<String> = self
            .store
            .comments_for_review(review_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if let Err(e) = self.store.delete_comments(&comment_ids).await {
            tracing::error!(
                review_id,
                error = %e,
                "Cascade delete failed; some comments may remain"
            );
            return Err(e);
        }

        self.store.delete_review(review_id).await?;

        tracing::info!(
            review_id,
            comments_deleted = comment_ids.len(),
            "Review deleted"
        );

        Ok(comment_ids.len())
    }

    /// List reviews (optionally for one author) with their comments.
    ///
    /// Reviews come back newest first, comments oldest first.
    pub async fn fetch_reviews_with_comments(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<ReviewWithComments>> {
        let mut reviews = self.store.list_reviews(user_id).await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let store = &self.store;
        let listing: Vec<ReviewWithComments> = stream::iter(reviews)
            .map(|review| async move {
                let mut comments = store.comments_for_review(&review.id).await?;
                comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                Ok::<_, AppError>(ReviewWithComments { review, comments })
            })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await?;

        tracing::debug!(
            user_id = ?user_id,
            count = listing.len(),
            "Fetched reviews with comments"
        );

        Ok(listing)
    }
}
