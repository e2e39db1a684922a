// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client wiring: one store, one session, one HTTP client, all services.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::notify::Notifier;
use crate::routes::Navigator;
use crate::services::{
    ApiClient, AuthService, CuratorService, ExamCoachService, LearningPathService,
    PlannerService, ProfileService, ServiceContext, SessionService, SyllabusService,
    TutorService,
};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Shared application state.
pub struct EduClient {
    pub config: Config,
    pub context: ServiceContext,
    pub auth: AuthService,
    pub tutor: TutorService,
    pub planner: PlannerService,
    pub curator: CuratorService,
    pub exams: ExamCoachService,
    pub syllabus: SyllabusService,
    pub learning_paths: LearningPathService,
    pub profile: ProfileService,
}

impl EduClient {
    /// Client persisting to the file store under `config.data_dir`.
    pub fn open(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let store = FileStore::open(config.store_path())?;
        tracing::info!(path = %store.path().display(), "Using file store");
        Self::with_store(config, Arc::new(store), notifier)
    }

    /// Client whose state lives only as long as the process.
    pub fn ephemeral(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()), notifier)
    }

    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let session = SessionService::new(store.clone());
        let navigator = Navigator::new(session.clone());
        let api = ApiClient::new(&config, session.clone(), navigator.clone())?;

        let context = ServiceContext {
            api,
            session,
            navigator,
            store,
            notifier,
        };

        tracing::debug!(api = %config.api_base_url, "EduVerse client ready");

        Ok(Self {
            auth: AuthService::new(context.clone()),
            tutor: TutorService::new(context.clone()),
            planner: PlannerService::new(context.clone()),
            curator: CuratorService::new(context.clone()),
            exams: ExamCoachService::new(context.clone()),
            syllabus: SyllabusService::new(context.clone()),
            learning_paths: LearningPathService::new(context.clone()),
            profile: ProfileService::new(context.clone()),
            context,
            config,
        })
    }

    pub fn session(&self) -> &SessionService {
        &self.context.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.context.navigator
    }

    pub fn api(&self) -> &ApiClient {
        &self.context.api
    }
}
