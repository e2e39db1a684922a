// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.
//!
//! One service per feature page. Each reads and writes its own slice of the
//! local store and decides how to degrade when the backend fails.

pub mod api;
pub mod auth;
pub mod curator;
pub mod exam;
pub mod learning_paths;
pub mod planner;
pub mod profile;
pub mod session;
pub mod syllabus;
pub mod tutor;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::notify::Notifier;
use crate::routes::Navigator;
use crate::storage::{KeyValueStore, Record, UserCollection};

pub use api::{AgentEnvelope, ApiClient};
pub use auth::AuthService;
pub use curator::CuratorService;
pub use exam::ExamCoachService;
pub use learning_paths::LearningPathService;
pub use planner::PlannerService;
pub use profile::ProfileService;
pub use session::SessionService;
pub use syllabus::SyllabusService;
pub use tutor::TutorService;

/// Handles shared by every feature service.
#[derive(Clone)]
pub struct ServiceContext {
    pub api: ApiClient,
    pub session: SessionService,
    pub navigator: Navigator,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl ServiceContext {
    /// Per-user collection for `feature`.
    pub fn collection<T>(&self, feature: &'static str) -> UserCollection<T>
    where
        T: Record + Serialize + DeserializeOwned + Clone,
    {
        UserCollection::new(self.store.clone(), self.session.clone(), feature)
    }
}

/// Reject blank required fields.
pub(crate) fn require(value: &str, field: &str) -> crate::error::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::error::AppError::Validation(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}
