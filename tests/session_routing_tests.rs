// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, logout and route gating.

use axum::{extract::Json as JsonBody, http::StatusCode, routing::post, Json, Router};
use eduverse_client::{
    error::AppError,
    models::RegisterRequest,
    notify::NoticeLevel,
    routes::{resolve, Navigation, Route},
    storage::{keys, KeyValueStore},
};
use serde_json::{json, Value};

mod common;

fn auth_app() -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(|JsonBody(body): JsonBody<Value>| async move {
                if body["password"] == "secret" {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "access_token": "tok-1",
                            "user": { "id": 17, "name": "Ada", "email": body["email"] }
                        })),
                    )
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "detail": "Invalid credentials" })),
                    )
                }
            }),
        )
        .route(
            "/auth/register",
            post(|| async { Json(json!({ "access_token": "tok-2", "user_id": "new-user" })) }),
        )
}

#[test]
fn test_route_gating_rules() {
    assert_eq!(resolve("/", false), Navigation::Render(Route::Landing));
    assert_eq!(resolve("/login", true), Navigation::Redirect(Route::Dashboard));
    assert_eq!(resolve("/register", true), Navigation::Redirect(Route::Dashboard));
    assert_eq!(resolve("/exam-coach", false), Navigation::Redirect(Route::Login));
    assert_eq!(resolve("/exam-coach", true), Navigation::Render(Route::ExamCoach));
    assert_eq!(resolve("/does-not-exist", true), Navigation::Redirect(Route::Landing));
}

#[tokio::test]
async fn test_login_starts_session_and_opens_dashboard() {
    let t = common::client_for(auth_app()).await;
    assert_eq!(t.client.navigator().current(), Route::Landing);

    let user_id = t.client.auth.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(user_id, "17");

    assert!(t.client.auth.is_authenticated());
    assert_eq!(t.store.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some("tok-1"));
    assert_eq!(t.store.get(keys::USER_ID).unwrap().as_deref(), Some("17"));
    assert_eq!(t.client.session().current_user_id(), "17");
    assert_eq!(t.client.navigator().current(), Route::Dashboard);
    assert!(t.notifier.contains(NoticeLevel::Success, "Welcome to EduVerse!"));
}

#[tokio::test]
async fn test_failed_login_keeps_session_empty() {
    let t = common::client_for(auth_app()).await;

    let err = t.client.auth.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Api(msg) if msg.contains("Invalid credentials")));
    assert!(!t.client.auth.is_authenticated());
    assert!(t.notifier.contains(NoticeLevel::Error, "Login failed"));
}

#[tokio::test]
async fn test_login_requires_fields() {
    let t = common::offline_client();
    let err = t.client.auth.login("", "secret").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg == "Email is required"));
}

#[tokio::test]
async fn test_register_then_logout() {
    let t = common::client_for(auth_app()).await;

    let request = RegisterRequest {
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        password: "hopper".to_string(),
        subjects: vec!["Math".to_string()],
        ..Default::default()
    };
    let user_id = t.client.auth.register(&request).await.unwrap();
    assert_eq!(user_id, "new-user");

    let user = t.client.session().user().unwrap();
    assert_eq!(user.user_id.as_deref(), Some("new-user"));

    t.client.auth.logout().unwrap();
    assert!(!t.client.auth.is_authenticated());
    assert!(t.client.session().user().is_none());
    assert_eq!(t.client.session().current_user_id(), "demo-user");
    assert_eq!(t.client.navigator().current(), Route::Landing);
    assert_eq!(
        t.client.navigator().navigate("/profile"),
        Navigation::Redirect(Route::Login)
    );
}
