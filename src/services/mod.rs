// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod profiles;
pub mod reviews;

pub use profiles::ProfileService;
pub use reviews::ReviewService;
