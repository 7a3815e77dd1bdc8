// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model (the `users` collection).

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum bio length in characters (after trimming).
pub const MAX_BIO_LENGTH: usize = 2000;
/// Maximum number of interests or skills.
pub const MAX_TAGS: usize = 50;

/// Public-facing profile keyed by the identity provider's user ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID, taken from the document name on read
    #[serde(rename(deserialize = "_firestore_id"))]
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Whether other users may view this profile
    #[serde(default)]
    pub is_public: bool,
    /// User IDs this user is connected with (symmetric)
    #[serde(default)]
    pub connections: Vec<String>,
}

impl UserProfile {
    /// Fresh private profile seeded from identity token data.
    pub fn new(uid: &str, display_name: Option<String>, photo_url: Option<String>) -> Self {
        Self {
            uid: uid.to_string(),
            display_name,
            photo_url,
            bio: String::new(),
            interests: Vec::new(),
            skills: Vec::new(),
            is_public: false,
            connections: Vec::new(),
        }
    }

    pub fn is_visible_to(&self, viewer: Option<&str>) -> bool {
        self.is_public || viewer == Some(self.uid.as_str())
    }

    /// Add a connection. Returns false if it was already present.
    pub fn add_connection(&mut self, uid: &str) -> bool {
        if self.connections.iter().any(|c| c == uid) {
            return false;
        }
        self.connections.push(uid.to_string());
        true
    }

    /// Apply a partial edit. Connections are never touched here.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.display_name {
            let name = name.trim().to_string();
            self.display_name = (!name.is_empty()).then_some(name);
        }
        if let Some(bio) = update.bio {
            self.bio = bio.trim().to_string();
        }
        if let Some(interests) = update.interests {
            self.interests = normalize_tags(interests);
        }
        if let Some(skills) = update.skills {
            self.skills = normalize_tags(skills);
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
    }
}

/// Partial profile edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    #[validate(length(max = 2000, message = "bio may be at most 2000 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 50, message = "interests may contain at most 50 entries"))]
    pub interests: Option<Vec<String>>,
    #[validate(length(max = 50, message = "skills may contain at most 50 entries"))]
    pub skills: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl ProfileUpdate {
    /// Trim free text so limits apply to what gets stored.
    pub fn trimmed(self) -> Self {
        Self {
            display_name: self.display_name.map(|name| name.trim().to_string()),
            bio: self.bio.map(|bio| bio.trim().to_string()),
            ..self
        }
    }
}

/// Trim entries, drop blanks and keep the first of any duplicates.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
