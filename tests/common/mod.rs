// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use eduverse_client::config::Config;
use eduverse_client::models::{LoginResponse, StoredUser};
use eduverse_client::notify::RecordingNotifier;
use eduverse_client::storage::MemoryStore;
use eduverse_client::EduClient;
use std::sync::Arc;

/// A client plus handles on its store and notices.
#[allow(dead_code)]
pub struct TestClient {
    pub client: EduClient,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Client pointed at `base_url`, backed by an in-memory store.
#[allow(dead_code)]
pub fn client_at(base_url: &str) -> TestClient {
    let config = Config::test_default().with_api_url(base_url);
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let client = EduClient::with_store(config, store.clone(), notifier.clone())
        .expect("Failed to build test client");
    TestClient {
        client,
        store,
        notifier,
    }
}

/// Client whose backend refuses every connection.
#[allow(dead_code)]
pub fn offline_client() -> TestClient {
    client_at(&Config::test_default().api_base_url)
}

/// Client talking to `router` served on an ephemeral local port.
#[allow(dead_code)]
pub async fn client_for(router: axum::Router) -> TestClient {
    let base_url = spawn_backend(router).await;
    client_at(&base_url)
}

/// Serve `router` on 127.0.0.1 and return its base URL.
#[allow(dead_code)]
pub async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test backend");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test backend failed");
    });
    format!("http://{}", addr)
}

/// Start a session as `user_id` with a fixed token.
#[allow(dead_code)]
pub fn log_in(client: &EduClient, user_id: &str) {
    let response = LoginResponse {
        access_token: "test-token".to_string(),
        user_id: Some(user_id.to_string()),
        user: Some(StoredUser {
            user_id: Some(user_id.to_string()),
            name: Some("Test Student".to_string()),
            email: Some("student@example.com".to_string()),
            ..Default::default()
        }),
    };
    client
        .session()
        .begin(&response)
        .expect("Failed to start session");
}
