// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store.
//!
//! Each collection is a `DashMap` keyed by document ID. Per-document
//! updates run under the map's entry lock; connections take an extra
//! mutex because they touch two documents.

use crate::db::{Store, UpvoteOutcome};
use crate::error::AppError;
use crate::models::{Comment, ProfileUpdate, Review, UserProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local store with the same semantics as the Firestore backend.
#[derive(Clone, Default)]
pub struct MemoryDb {
    reviews: Arc<DashMap<String, Review>>,
    comments: Arc<DashMap<String, Comment>>,
    users: Arc<DashMap<String, UserProfile>>,
    connect_lock: Arc<Mutex<()>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryDb {
    async fn insert_review(&self, review: &Review) -> Result<(), AppError> {
        self.reviews.insert(review.id.clone(), review.clone());
        Ok(())
    }

    async fn get_review(&self, review_id: &str) -> Result<Option<Review>, AppError> {
        Ok(self.reviews.get(review_id).map(|r| r.value().clone()))
    }

    async fn list_reviews(&self, user_id: Option<&str>) -> Result<Vec<Review>, AppError> {
        Ok(self
            .reviews
            .iter()
            .filter(|r| user_id.map_or(true, |uid| r.user_id == uid))
            .map(|r| r.value().clone())
            .collect())
    }

    async fn toggle_upvote(
        &self,
        review_id: &str,
        user_id: &str,
    ) -> Result<Option<UpvoteOutcome>, AppError> {
        Ok(self.reviews.get_mut(review_id).map(|mut review| {
            let change = review.toggle_upvote(user_id);
            UpvoteOutcome {
                change,
                upvotes: review.upvotes,
            }
        }))
    }

    async fn delete_review(&self, review_id: &str) -> Result<(), AppError> {
        self.reviews.remove(review_id);
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        self.comments.insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    async fn comments_for_review(&self, review_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.review_id == review_id)
            .map(|c| c.value().clone())
            .collect())
    }

    async fn delete_comments(&self, comment_ids: &[String]) -> Result<(), AppError> {
        for id in comment_ids {
            self.comments.remove(id);
        }
        Ok(())
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users.get(uid).map(|p| p.value().clone()))
    }

    async fn create_profile_if_missing(
        &self,
        profile: &UserProfile,
    ) -> Result<UserProfile, AppError> {
        Ok(self
            .users
            .entry(profile.uid.clone())
            .or_insert_with(|| profile.clone())
            .value()
            .clone())
    }

    async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users.get_mut(uid).map(|mut profile| {
            profile.apply(update);
            profile.value().clone()
        }))
    }

    async fn connect(&self, uid_a: &str, uid_b: &str) -> Result<bool, AppError> {
        let _guard = self.connect_lock.lock().await;

        if !self.users.contains_key(uid_a) || !self.users.contains_key(uid_b) {
            return Ok(false);
        }

        // Each guard is dropped before taking the next to avoid shard deadlocks.
        if let Some(mut a) = self.users.get_mut(uid_a) {
            a.add_connection(uid_b);
        }
        if let Some(mut b) = self.users.get_mut(uid_b) {
            b.add_connection(uid_a);
        }

        Ok(true)
    }
}
