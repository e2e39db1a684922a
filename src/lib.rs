// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EduVerse client: AI-assisted study tools on top of the EduVerse API
//!
//! This crate provides the session gate and router, the HTTP client, local
//! per-user persistence, and the feature services (tutor, study planner,
//! resource curator, exam coach, syllabus analyzer, learning paths, profile).

pub mod app;
pub mod config;
pub mod error;
pub mod exam;
pub mod models;
pub mod notify;
pub mod outcome;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

pub use app::EduClient;
pub use error::{AppError, Result};
pub use outcome::{DegradedReason, Sourced};
