// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key-value storage and per-user collections.

pub mod collection;
pub mod file;
pub mod memory;

pub use collection::{Inserted, Loaded, Record, UserCollection};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::AppError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AppError>;

/// A flat string-to-string store, the client's only shared resource.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Store key names.
pub mod keys {
    /// Bearer token of the logged-in user
    pub const AUTH_TOKEN: &str = "auth_token";
    /// Identifier of the logged-in user
    pub const USER_ID: &str = "user_id";
    /// Serialized user object from the login response
    pub const USER: &str = "user";

    pub const STUDY_PLANS: &str = "studyPlans";
    pub const EXAMS: &str = "examCoachExams";
    pub const EXAM_HISTORY: &str = "examCoachHistory";
    pub const SAVED_RESOURCES: &str = "savedResources";
    /// Recent resource searches (newest first)
    pub const RESOURCE_SEARCH_HISTORY: &str = "resourceSearchHistory";
    pub const SYLLABUS_ANALYSES: &str = "syllabusAnalyses";
    pub const LEARNING_PATHS: &str = "learningPaths";

    /// Compose the per-user key for a feature collection.
    pub fn user_key(feature: &str, user_id: &str) -> String {
        format!("{}_{}", feature, user_id)
    }
}
