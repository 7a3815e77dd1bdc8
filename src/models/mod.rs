// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod comment;
pub mod profile;
pub mod review;

pub use comment::{Comment, FlavorTags};
pub use profile::{ProfileUpdate, UserProfile};
pub use review::{Review, ReviewFields, UpvoteChange};

use serde::Serialize;

/// A review with its comments attached, as returned by listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithComments {
    #[serde(flatten)]
    pub review: Review,
    pub comments: Vec<Comment>,
}
