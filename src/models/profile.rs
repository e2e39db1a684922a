//! User profile model.

use serde::{Deserialize, Serialize};

use super::{flex, StoredUser};

/// Profile as shown on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub grade: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub preferences: serde_json::Value,
}

impl UserProfile {
    /// Build a profile from the cached session user.
    pub fn from_session(user: &StoredUser, now: &str) -> Self {
        Self {
            name: user.name.clone().unwrap_or_else(|| "User".to_string()),
            email: user.email.clone().unwrap_or_default(),
            created_at: user.created_at.clone().unwrap_or_else(|| now.to_string()),
            grade: user.grade.clone(),
            subjects: user.subjects.clone(),
            learning_style: user.learning_style.clone(),
            preferences: user
                .preferences
                .clone()
                .unwrap_or_else(|| serde_json::json!({})),
        }
    }

    /// Fill blanks in a backend profile from the session user.
    pub fn merged_with(mut self, user: &StoredUser) -> Self {
        if self.name.is_empty() {
            self.name = user.name.clone().unwrap_or_default();
        }
        if self.email.is_empty() {
            self.email = user.email.clone().unwrap_or_default();
        }
        if self.created_at.is_empty() {
            self.created_at = user.created_at.clone().unwrap_or_default();
        }
        if self.preferences.is_null() {
            self.preferences = user
                .preferences
                .clone()
                .unwrap_or_else(|| serde_json::json!({}));
        }
        self
    }
}

/// Editable profile fields sent to `PUT /auth/profile/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
}

impl ProfileUpdate {
    /// Apply these fields to the cached session user.
    pub fn apply_to(&self, user: &mut StoredUser) {
        user.name = Some(self.name.clone());
        user.grade = self.grade.clone();
        user.subjects = self.subjects.clone();
        user.learning_style = self.learning_style.clone();
    }
}

/// Activity counts shown on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub study_sessions: usize,
    pub exams_taken: usize,
    pub resources_saved: usize,
    pub learning_paths: usize,
}
