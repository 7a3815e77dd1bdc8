// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and connection service.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{ProfileUpdate, UserProfile};
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetch a profile as seen by `viewer` (None for anonymous callers).
    pub async fn get_profile(&self, viewer: Option<&str>, uid: &str) -> Result<UserProfile> {
        let profile = self
            .store
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !profile.is_visible_to(viewer) {
            return Err(AppError::Forbidden("This profile is private".to_string()));
        }

        Ok(profile)
    }

    /// Return the caller's profile, creating it from token claims on first use.
    pub async fn get_or_create_own_profile(
        &self,
        uid: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<UserProfile> {
        let seed = UserProfile::new(
            uid,
            display_name.map(str::to_string),
            photo_url.map(str::to_string),
        );
        let profile = self.store.create_profile_if_missing(&seed).await?;
        Ok(profile)
    }

    /// Apply a partial edit to the caller's own profile.
    pub async fn update_own_profile(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile> {
        let update = update.trimmed();
        update.validate()?;

        let profile = self
            .store
            .update_profile(uid, update)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(uid, is_public = profile.is_public, "Profile updated");
        Ok(profile)
    }

    /// Connect two users. Both end up in each other's connections.
    pub async fn connect(&self, requester_id: &str, target_id: &str) -> Result<()> {
        if requester_id == target_id {
            return Err(AppError::BadRequest(
                "Cannot connect with yourself".to_string(),
            ));
        }

        if !self.store.connect(requester_id, target_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(requester_id, target_id, "Users connected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::models::profile::MAX_TAGS;

    async fn sign_in(svc: &ProfileService, uid: &str) -> UserProfile {
        svc.get_or_create_own_profile(uid, Some(&uid.to_uppercase()), None)
            .await
            .unwrap()
    }

    async fn service_with(users: &[&str]) -> ProfileService {
        let svc = ProfileService::new(Arc::new(MemoryDb::new()));
        for uid in users {
            sign_in(&svc, uid).await;
        }
        svc
    }

    #[tokio::test]
    async fn test_own_profile_created_once() {
        let svc = service_with(&["alice"]).await;
        svc.update_own_profile(
            "alice",
            ProfileUpdate {
                bio: Some("reads a lot".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let again = sign_in(&svc, "alice").await;
        assert_eq!(again.bio, "reads a lot");
        assert_eq!(again.display_name.as_deref(), Some("ALICE"));
        assert!(!again.is_public);
    }

    #[tokio::test]
    async fn test_private_profile_visibility() {
        let svc = service_with(&["alice"]).await;

        assert!(svc.get_profile(Some("alice"), "alice").await.is_ok());
        let err = svc.get_profile(Some("bob"), "alice").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = svc.get_profile(None, "alice").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        svc.update_own_profile(
            "alice",
            ProfileUpdate {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(svc.get_profile(None, "alice").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let svc = service_with(&[]).await;
        let err = svc.get_profile(None, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_connect_is_symmetric_and_idempotent() {
        let svc = service_with(&["alice", "bob"]).await;

        svc.connect("alice", "bob").await.unwrap();
        svc.connect("bob", "alice").await.unwrap();

        let alice = svc.get_profile(Some("alice"), "alice").await.unwrap();
        let bob = svc.get_profile(Some("bob"), "bob").await.unwrap();
        assert_eq!(alice.connections, vec!["bob"]);
        assert_eq!(bob.connections, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_connect_rejects_self_and_unknown() {
        let svc = service_with(&["alice"]).await;

        let err = svc.connect("alice", "alice").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = svc.connect("alice", "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_oversized_lists() {
        let svc = service_with(&["alice"]).await;
        let update = ProfileUpdate {
            skills: Some((0..=MAX_TAGS).map(|i| format!("skill{}", i)).collect()),
            ..Default::default()
        };

        let err = svc.update_own_profile("alice", update).await.unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("skills")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_stores_trimmed_bio() {
        let svc = service_with(&["alice"]).await;
        let profile = svc
            .update_own_profile(
                "alice",
                ProfileUpdate {
                    bio: Some(format!("   {}   ", "b".repeat(2000))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.bio.chars().count(), 2000);
    }
}
