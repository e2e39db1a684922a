// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Learning paths and step progress.

use chrono::Utc;
use rand::Rng;
use serde_json::Value;

use super::{require, ServiceContext};
use crate::error::{AppError, Result};
use crate::models::learning_path::default_paths;
use crate::models::{LearningPath, PathForm, PathStatus};
use crate::storage::{keys, Loaded, UserCollection};

pub struct LearningPathService {
    ctx: ServiceContext,
    paths: UserCollection<LearningPath>,
}

impl LearningPathService {
    pub fn new(ctx: ServiceContext) -> Self {
        let paths = ctx.collection(keys::LEARNING_PATHS);
        Self { ctx, paths }
    }

    /// The user's paths. A user with nothing stored gets the starter paths,
    /// which are saved right away.
    pub fn list(&self) -> Result<Vec<LearningPath>> {
        match self.paths.load()? {
            Loaded::Items(paths) => Ok(paths),
            Loaded::Missing => {
                let defaults = default_paths();
                self.paths.replace(&defaults)?;
                tracing::debug!(key = %self.paths.key(), "Seeded starter learning paths");
                Ok(defaults)
            }
            Loaded::Corrupt => Ok(default_paths()),
        }
    }

    pub fn get(&self, path_id: u64) -> Result<LearningPath> {
        self.list()?
            .into_iter()
            .find(|p| p.id == path_id)
            .ok_or_else(|| AppError::NotFound(format!("learning path {}", path_id)))
    }

    pub fn create(&self, form: &PathForm) -> Result<LearningPath> {
        if require(&form.title, "Title").is_err() || require(&form.subject, "Subject").is_err() {
            self.ctx.notifier.error("Please fill in title and subject");
            return Err(AppError::Validation("Title and subject are required".to_string()));
        }

        let path = LearningPath {
            id: Utc::now().timestamp_millis().unsigned_abs(),
            title: form.title.trim().to_string(),
            subject: form.subject.trim().to_string(),
            difficulty_level: form.difficulty_level.clone(),
            estimated_duration: form.estimated_duration.clone(),
            status: PathStatus::Available,
            progress: 0,
            steps_count: rand::thread_rng().gen_range(5..=14),
            goals: form.goals.submitted(),
            steps: Vec::new(),
        };

        let mut paths = self.list()?;
        paths.push(path.clone());
        self.paths.replace(&paths)?;

        tracing::info!(path_id = path.id, "Learning path created");
        self.ctx.notifier.success("Learning path created successfully!");
        Ok(path)
    }

    /// Mark a path as active.
    pub fn start(&self, path_id: u64) -> Result<LearningPath> {
        let path = self.modify(path_id, |path| {
            path.status = PathStatus::Active;
            Ok(())
        })?;
        self.ctx
            .notifier
            .success("Learning path started! Begin your journey.");
        Ok(path)
    }

    /// Complete one step and recompute the path's progress.
    pub fn complete_step(&self, path_id: u64, step_id: u64) -> Result<LearningPath> {
        let path = self.modify(path_id, |path| {
            let step = path
                .steps
                .iter_mut()
                .find(|s| s.id == step_id)
                .ok_or_else(|| {
                    AppError::NotFound(format!("step {} of learning path {}", step_id, path_id))
                })?;
            step.completed = true;
            path.recompute_progress();
            Ok(())
        })?;

        tracing::info!(path_id, step_id, progress = path.progress, "Learning step completed");
        self.ctx
            .notifier
            .success("Step completed! Keep up the great work.");
        Ok(path)
    }

    fn modify<F>(&self, path_id: u64, f: F) -> Result<LearningPath>
    where
        F: FnOnce(&mut LearningPath) -> Result<()>,
    {
        let mut paths = self.list()?;
        let path = paths
            .iter_mut()
            .find(|p| p.id == path_id)
            .ok_or_else(|| AppError::NotFound(format!("learning path {}", path_id)))?;
        f(path)?;
        let updated = path.clone();
        self.paths.replace(&paths)?;
        Ok(updated)
    }

    /// Paths the syllabus analyzer stored on the backend.
    pub async fn remote_paths(&self) -> Result<Value> {
        self.ctx.api.learning_paths().await
    }

    pub async fn path_resources(&self, path_id: &str) -> Result<Value> {
        self.ctx.api.learning_path_resources(path_id).await
    }
}
