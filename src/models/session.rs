//! Session and authentication payloads.

use serde::{Deserialize, Serialize};

use super::flex;

/// User object cached in the store under the `user` key.
///
/// Backends have sent the identifier as `user_id` or `id`; both are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(default, deserialize_with = "flex::opt_string", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_string", skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<serde_json::Value>,
}

impl StoredUser {
    /// Identifier carried by the user object itself, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<String>,
}

/// Login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "token", alias = "auth_token")]
    pub access_token: String,
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<StoredUser>,
}

impl LoginResponse {
    /// The user id from the top level, falling back to the embedded user.
    pub fn resolved_user_id(&self) -> Option<String> {
        self.user_id
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.user
                    .as_ref()
                    .and_then(|u| u.identifier().map(str::to_string))
            })
    }
}
