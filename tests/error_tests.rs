// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use eduverse_client::error::{mentions_quota, AppError};

#[test]
fn test_is_quota_error_matches() {
    let err = AppError::RateLimited("Too many requests".to_string());
    assert!(err.is_quota_error());

    let err = AppError::Api("HTTP 500: AI quota exhausted".to_string());
    assert!(err.is_quota_error());

    let err = AppError::Api("HTTP 429 Too Many Requests: slow down".to_string());
    assert!(err.is_quota_error());

    let err = AppError::Network("upstream said quota".to_string());
    assert!(err.is_quota_error());
}

#[test]
fn test_is_quota_error_no_match() {
    let err = AppError::Api("HTTP 500: Internal Server Error".to_string());
    assert!(!err.is_quota_error());

    let err = AppError::Validation("quota is required".to_string());
    assert!(!err.is_quota_error());

    assert!(!AppError::Unauthorized.is_quota_error());
}

#[test]
fn test_mentions_quota_is_case_sensitive() {
    assert!(mentions_quota("Daily quota reached"));
    assert!(mentions_quota("error 429"));
    assert!(!mentions_quota("Quota reached"));
}

#[test]
fn test_error_messages() {
    assert_eq!(AppError::Unauthorized.to_string(), "Authentication required");
    assert_eq!(
        AppError::Validation("Title is required".to_string()).to_string(),
        "Invalid input: Title is required"
    );
    assert!(AppError::Unauthorized.is_unauthorized());
    assert!(!AppError::NotFound("plan".to_string()).is_unauthorized());
}
