// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.

/// Application error type shared by the API client, storage and services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid exam transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Marker substrings the backend uses to signal an exhausted AI quota.
    pub const QUOTA_MARKERS: [&'static str; 2] = ["quota", "429"];

    /// True when the error means "the backend is out of quota / rate limited".
    pub fn is_quota_error(&self) -> bool {
        match self {
            AppError::RateLimited(_) => true,
            AppError::Api(msg) | AppError::Network(msg) => mentions_quota(msg),
            _ => false,
        }
    }

    /// True for a 401 from the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

/// Check a free-form backend error message for quota markers.
pub fn mentions_quota(message: &str) -> bool {
    AppError::QUOTA_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(anyhow::anyhow!("JSON error: {}", err))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
