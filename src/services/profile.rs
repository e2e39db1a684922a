// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page: account details, edits, password change and activity counts.

use chrono::Utc;

use super::api::ChangePasswordRequest;
use super::ServiceContext;
use crate::error::{AppError, Result};
use crate::models::{
    ExamResult, LearningPath, ProfileStats, ProfileUpdate, Resource, StoredUser, StudyPlan,
    UserProfile,
};
use crate::outcome::{DegradedReason, Sourced};
use crate::storage::keys;
use crate::time_utils::format_utc_rfc3339;

pub const MIN_PASSWORD_LEN: usize = 6;

pub struct ProfileService {
    ctx: ServiceContext,
}

impl ProfileService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Stored user and its id, or a forced trip to the login page.
    fn require_user(&self) -> Result<(String, StoredUser)> {
        let user = self.ctx.session.user();
        match (self.ctx.session.profile_user_id(), user) {
            (Some(id), Some(user)) => Ok((id, user)),
            _ => {
                self.ctx.notifier.error("Please log in again");
                self.ctx.navigator.force_login();
                Err(AppError::Unauthorized)
            }
        }
    }

    /// Profile from the backend, or from session data when it is unavailable.
    pub async fn load(&self) -> Result<Sourced<UserProfile>> {
        let (user_id, user) = self.require_user()?;
        let local = || UserProfile::from_session(&user, &format_utc_rfc3339(Utc::now()));

        match self.ctx.api.get_profile(&user_id).await {
            Ok(envelope) => match envelope.profile {
                Some(profile) if envelope.success => Ok(Sourced::Live(profile.merged_with(&user))),
                _ => Ok(Sourced::degraded(
                    local(),
                    DegradedReason::ProcessingError(
                        envelope
                            .message
                            .unwrap_or_else(|| "profile not returned".to_string()),
                    ),
                )),
            },
            Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
            Err(e) => {
                tracing::info!(error = %e, "Backend profile not available, using session data");
                Ok(Sourced::degraded(local(), DegradedReason::Unavailable(e.to_string())))
            }
        }
    }

    /// Save profile edits. When the backend cannot take them they are kept in
    /// the local session copy.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<Sourced<StoredUser>> {
        let (user_id, mut user) = self.require_user()?;

        let failure = match self.ctx.api.update_profile(&user_id, update).await {
            Ok(envelope) => match envelope.profile {
                Some(profile) if envelope.success => {
                    let confirmed = ProfileUpdate {
                        name: profile.name,
                        grade: profile.grade,
                        subjects: profile.subjects,
                        learning_style: profile.learning_style,
                    };
                    confirmed.apply_to(&mut user);
                    self.ctx.session.set_user(&user)?;
                    self.ctx.notifier.success("Profile updated successfully!");
                    return Ok(Sourced::Live(user));
                }
                _ => DegradedReason::ProcessingError("Update failed".to_string()),
            },
            Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
            Err(e) => DegradedReason::Unavailable(e.to_string()),
        };

        tracing::warn!(reason = %failure, "Profile update not accepted, saving locally");
        update.apply_to(&mut user);
        self.ctx.session.set_user(&user)?;
        self.ctx
            .notifier
            .error("Backend unavailable - changes saved locally");
        Ok(Sourced::degraded(user, failure))
    }

    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        if new != confirm {
            self.ctx.notifier.error("New passwords do not match");
            return Err(AppError::Validation("New passwords do not match".to_string()));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            self.ctx
                .notifier
                .error("Password must be at least 6 characters long");
            return Err(AppError::Validation(
                "Password must be at least 6 characters long".to_string(),
            ));
        }

        let request = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };

        match self.ctx.api.change_password(&request).await {
            Ok(envelope) if envelope.success => {
                self.ctx.notifier.success("Password changed successfully!");
                Ok(())
            }
            Ok(envelope) => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| "Failed to change password".to_string());
                self.ctx.notifier.error(&message);
                Err(AppError::Api(message))
            }
            Err(e) => {
                self.ctx.notifier.error("Failed to change password");
                Err(e)
            }
        }
    }

    /// Activity counts from the current user's local data.
    pub fn stats(&self) -> Result<ProfileStats> {
        Ok(ProfileStats {
            study_sessions: self.ctx.collection::<StudyPlan>(keys::STUDY_PLANS).list()?.len(),
            exams_taken: self.ctx.collection::<ExamResult>(keys::EXAM_HISTORY).list()?.len(),
            resources_saved: self.ctx.collection::<Resource>(keys::SAVED_RESOURCES).list()?.len(),
            learning_paths: self
                .ctx
                .collection::<LearningPath>(keys::LEARNING_PATHS)
                .list()?
                .len(),
        })
    }
}
