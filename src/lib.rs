// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! BookBay: share and discuss book recommendations
//!
//! This crate provides the backend API for posting book reviews, commenting,
//! upvoting, and connecting reader profiles, stored in Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::{ProfileService, ReviewService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub review_service: ReviewService,
    pub profile_service: ProfileService,
}

impl AppState {
    /// Wire the services to a store.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            config,
            review_service: ReviewService::new(store.clone()),
            profile_service: ProfileService::new(store),
        }
    }
}
