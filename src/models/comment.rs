// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Review comment model.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum comment length in characters (after trimming).
pub const MAX_COMMENT_LENGTH: usize = 2000;

// A tag is set when its uniform draw exceeds the threshold,
// i.e. with probability 0.3, 0.2 and 0.1 respectively.
const HACKER_THRESHOLD: f64 = 0.7;
const NERD_THRESHOLD: f64 = 0.8;
const ENTREPRENEUR_THRESHOLD: f64 = 0.9;

/// Comment document stored in the `comments` collection.
///
/// Comments are immutable once written; they only disappear when
/// their review is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename(deserialize = "_firestore_id"))]
    pub id: String,
    /// Review this comment belongs to (not enforced by the store)
    pub review_id: String,
    pub user_id: String,
    #[serde(
        default = "crate::models::review::anonymous_author",
        deserialize_with = "crate::models::review::author_name_or_anonymous"
    )]
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_hacker: bool,
    #[serde(default)]
    pub is_nerd: bool,
    #[serde(default)]
    pub is_entrepreneur: bool,
}

/// Cosmetic tags used by the frontend to style a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlavorTags {
    pub hacker: bool,
    pub nerd: bool,
    pub entrepreneur: bool,
}

impl FlavorTags {
    /// Draw each tag independently.
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self::from_draws(rng.gen(), rng.gen(), rng.gen())
    }

    fn from_draws(hacker: f64, nerd: f64, entrepreneur: f64) -> Self {
        Self {
            hacker: hacker > HACKER_THRESHOLD,
            nerd: nerd > NERD_THRESHOLD,
            entrepreneur: entrepreneur > ENTREPRENEUR_THRESHOLD,
        }
    }
}

impl Comment {
    /// Build a comment. `content` must already be trimmed and non-empty.
    pub fn new(
        review_id: &str,
        user_id: &str,
        author_name: &str,
        content: String,
        tags: FlavorTags,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            review_id: review_id.to_string(),
            user_id: user_id.to_string(),
            author_name: author_name.to_string(),
            content,
            created_at: Utc::now(),
            is_hacker: tags.hacker,
            is_nerd: tags.nerd,
            is_entrepreneur: tags.entrepreneur,
        }
    }
}
