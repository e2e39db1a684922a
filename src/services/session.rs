// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gate: the stored bearer token and current user.
//!
//! This is the only place that knows how the user id is resolved. All
//! repositories and the HTTP client go through it.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{LoginResponse, StoredUser};
use crate::storage::{keys, KeyValueStore};

/// Identifier used when no session information is stored at all.
pub const DEMO_USER_ID: &str = "demo-user";

/// Reads and writes session state in the key-value store.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session key");
                None
            }
        }
    }

    /// Bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.read(keys::AUTH_TOKEN)
    }

    /// The bare `user_id` key.
    pub fn stored_user_id(&self) -> Option<String> {
        self.read(keys::USER_ID)
    }

    /// Cached user object. A corrupt record is logged and ignored.
    pub fn user(&self) -> Option<StoredUser> {
        let raw = self.read(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user is not valid JSON, ignoring");
                None
            }
        }
    }

    /// Current user id: `user.user_id`, then `user.id`, then the `user_id`
    /// key, then [`DEMO_USER_ID`].
    pub fn current_user_id(&self) -> String {
        self.user()
            .and_then(|u| u.identifier().map(str::to_string))
            .or_else(|| self.stored_user_id())
            .unwrap_or_else(|| DEMO_USER_ID.to_string())
    }

    /// Id carried by the cached user object only (the profile page requires it).
    pub fn profile_user_id(&self) -> Option<String> {
        self.user().and_then(|u| u.identifier().map(str::to_string))
    }

    /// Both a token and a user id are stored.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.stored_user_id().is_some()
    }

    /// Persist a login/register response. Returns the user id.
    pub fn begin(&self, response: &LoginResponse) -> Result<String> {
        let user_id = response
            .resolved_user_id()
            .ok_or_else(|| AppError::Api("Login response carried no user id".to_string()))?;

        let mut user = response.user.clone().unwrap_or_default();
        if user.identifier().is_none() {
            user.user_id = Some(user_id.clone());
        }

        self.store.set(keys::AUTH_TOKEN, &response.access_token)?;
        self.store.set(keys::USER_ID, &user_id)?;
        self.set_user(&user)?;

        tracing::info!(user_id = %user_id, "Session started");
        Ok(user_id)
    }

    /// Replace the cached user object.
    pub fn set_user(&self, user: &StoredUser) -> Result<()> {
        let body = serde_json::to_string(user)?;
        self.store.set(keys::USER, &body)
    }

    /// Log out: token, user id and cached user are removed. Per-user feature
    /// data stays for the next login.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::USER_ID)?;
        self.store.remove(keys::USER)?;
        tracing::info!("Session ended");
        Ok(())
    }

    /// Drop the credentials after the server rejected them.
    pub fn clear_credentials(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::USER_ID)?;
        tracing::warn!("Credentials cleared after authorization failure");
        Ok(())
    }
}
