// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Provides typed operations for:
//! - Reviews (with transactional upvote toggles)
//! - Comments (queried by `reviewId`)
//! - Users (profiles and symmetric connections)

use crate::db::{collections, Store, UpvoteOutcome};
use crate::error::AppError;
use crate::models::{Comment, ProfileUpdate, Review, UserProfile};
use async_trait::async_trait;
use futures_util::FutureExt;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Delete documents by ID in chunked transactions.
    ///
    /// Each chunk commits independently; an error leaves earlier chunks deleted.
    async fn batch_delete(&self, collection: &str, doc_ids: &[String]) -> Result<(), AppError> {
        for chunk in doc_ids.chunks(BATCH_SIZE) {
            let mut transaction = self
                .client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                self.client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── Review Operations ───────────────────────────────────────

    async fn insert_review(&self, review: &Review) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::REVIEWS)
            .document_id(&review.id)
            .object(review)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn get_review(&self, review_id: &str) -> Result<Option<Review>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::REVIEWS)
            .obj()
            .one(review_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_reviews(&self, user_id: Option<&str>) -> Result<Vec<Review>, AppError> {
        let query = self.client.fluent().select().from(collections::REVIEWS);

        let query = if let Some(uid) = user_id {
            let uid = uid.to_string();
            query.filter(move |q| q.field("userId").eq(uid.clone()))
        } else {
            query
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Toggle inside a Firestore transaction. The read registers the review
    /// for conflict detection, so a concurrent toggle makes Firestore retry
    /// with fresh data instead of losing an update.
    async fn toggle_upvote(
        &self,
        review_id: &str,
        user_id: &str,
    ) -> Result<Option<UpvoteOutcome>, AppError> {
        let review_id = review_id.to_string();
        let user_id = user_id.to_string();

        let outcome = self
            .client
            .run_transaction(|db, transaction| {
                let review_id = review_id.clone();
                let user_id = user_id.clone();
                async move {
                    let current: Option<Review> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::REVIEWS)
                        .obj()
                        .one(&review_id)
                        .await?;

                    let Some(mut review) = current else {
                        return Ok(None);
                    };

                    let change = review.toggle_upvote(&user_id);

                    db.fluent()
                        .update()
                        .in_col(collections::REVIEWS)
                        .document_id(&review_id)
                        .object(&review)
                        .add_to_transaction(transaction)?;

                    Ok(Some(UpvoteOutcome {
                        change,
                        upvotes: review.upvotes,
                    }))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Upvote transaction failed: {}", e)))?;

        Ok(outcome)
    }

    async fn delete_review(&self, review_id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::REVIEWS)
            .document_id(review_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Comment Operations ──────────────────────────────────────

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::COMMENTS)
            .document_id(&comment.id)
            .object(comment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn comments_for_review(&self, review_id: &str) -> Result<Vec<Comment>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::COMMENTS)
            .filter(|q| q.field("reviewId").eq(review_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete_comments(&self, comment_ids: &[String]) -> Result<(), AppError> {
        self.batch_delete(collections::COMMENTS, comment_ids).await
    }

    // ─── Profile Operations ──────────────────────────────────────

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_profile_if_missing(
        &self,
        profile: &UserProfile,
    ) -> Result<UserProfile, AppError> {
        let profile = profile.clone();

        self.client
            .run_transaction(|db, transaction| {
                let profile = profile.clone();
                async move {
                    let existing: Option<UserProfile> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&profile.uid)
                        .await?;

                    if let Some(existing) = existing {
                        return Ok(existing);
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&profile.uid)
                        .object(&profile)
                        .add_to_transaction(transaction)?;

                    Ok(profile)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Profile creation failed: {}", e)))
    }

    async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>, AppError> {
        let uid = uid.to_string();

        self.client
            .run_transaction(|db, transaction| {
                let uid = uid.clone();
                let update = update.clone();
                async move {
                    let current: Option<UserProfile> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&uid)
                        .await?;

                    let Some(mut profile) = current else {
                        return Ok(None);
                    };
                    profile.apply(update);

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&uid)
                        .object(&profile)
                        .add_to_transaction(transaction)?;

                    Ok(Some(profile))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Profile update failed: {}", e)))
    }

    /// Both sides of the connection commit together or not at all.
    async fn connect(&self, uid_a: &str, uid_b: &str) -> Result<bool, AppError> {
        let uid_a = uid_a.to_string();
        let uid_b = uid_b.to_string();

        self.client
            .run_transaction(|db, transaction| {
                let uid_a = uid_a.clone();
                let uid_b = uid_b.clone();
                async move {
                    let a: Option<UserProfile> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&uid_a)
                        .await?;
                    let b: Option<UserProfile> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&uid_b)
                        .await?;

                    let (Some(mut a), Some(mut b)) = (a, b) else {
                        return Ok(false);
                    };

                    a.add_connection(&uid_b);
                    b.add_connection(&uid_a);

                    for profile in [&a, &b] {
                        db.fluent()
                            .update()
                            .in_col(collections::USERS)
                            .document_id(&profile.uid)
                            .object(profile)
                            .add_to_transaction(transaction)?;
                    }

                    Ok(true)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Connection transaction failed: {}", e)))
    }
}
