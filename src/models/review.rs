// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Book review model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Author name used when the identity token carries no display name.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Review document stored in the `reviews` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Document ID. Read back from the document name, so documents
    /// without a stored `id` field still load.
    #[serde(rename(deserialize = "_firestore_id"))]
    pub id: String,
    pub book_title: String,
    pub summary: String,
    /// Intended reader grade level, free text ("5th grade", "YA", ...)
    pub grade_level: String,
    /// Why the author recommends the book
    pub reasons: String,
    /// Author's user ID
    pub user_id: String,
    #[serde(default = "anonymous_author", deserialize_with = "author_name_or_anonymous")]
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub upvoted_by: Vec<String>,
}

pub(crate) fn anonymous_author() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

/// Older documents may carry a null or blank author name.
pub(crate) fn author_name_or_anonymous<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(anonymous_author))
}

/// Result of toggling a user's upvote on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpvoteChange {
    Added,
    Removed,
}

impl Review {
    /// Build a new review with no upvotes.
    pub fn new(user_id: &str, author_name: Option<&str>, fields: ReviewFields) -> Self {
        let author_name = author_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            book_title: fields.book_title,
            summary: fields.summary,
            grade_level: fields.grade_level,
            reasons: fields.reasons,
            user_id: user_id.to_string(),
            author_name: author_name.to_string(),
            created_at: Utc::now(),
            upvotes: 0,
            upvoted_by: Vec::new(),
        }
    }

    pub fn is_upvoted_by(&self, user_id: &str) -> bool {
        self.upvoted_by.iter().any(|id| id == user_id)
    }

    /// Flip `user_id`'s upvote. The count moves by one in either direction
    /// and never drops below zero.
    pub fn toggle_upvote(&mut self, user_id: &str) -> UpvoteChange {
        if self.is_upvoted_by(user_id) {
            self.upvoted_by.retain(|id| id != user_id);
            self.upvotes = self.upvotes.saturating_sub(1);
            UpvoteChange::Removed
        } else {
            self.upvoted_by.push(user_id.to_string());
            self.upvotes += 1;
            UpvoteChange::Added
        }
    }
}

/// Author-supplied review text. All fields are required; missing ones
/// deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewFields {
    #[validate(length(min = 1, max = 200, message = "bookTitle must be 1-200 characters"))]
    pub book_title: String,
    #[validate(length(min = 1, max = 5000, message = "summary must be 1-5000 characters"))]
    pub summary: String,
    #[validate(length(min = 1, max = 50, message = "gradeLevel must be 1-50 characters"))]
    pub grade_level: String,
    #[validate(length(min = 1, max = 5000, message = "reasons must be 1-5000 characters"))]
    pub reasons: String,
}

impl ReviewFields {
    /// Trim surrounding whitespace so blank fields fail validation.
    pub fn trimmed(self) -> Self {
        Self {
            book_title: self.book_title.trim().to_string(),
            summary: self.summary.trim().to_string(),
            grade_level: self.grade_level.trim().to_string(),
            reasons: self.reasons.trim().to_string(),
        }
    }
}
