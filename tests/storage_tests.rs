// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File store persistence and per-user collection scoping.

use std::sync::Arc;

use axum::{routing::post, Json, Router};
use chrono::Utc;
use eduverse_client::{
    config::Config,
    models::{ExamForm, PlanForm, Resource},
    notify::RecordingNotifier,
    storage::{keys, FileStore, KeyValueStore, MemoryStore},
    EduClient,
};
use serde_json::json;

mod common;

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = FileStore::open(&path).unwrap();
    assert!(store.keys().unwrap().is_empty());
    store.set("auth_token", "abc").unwrap();
    store.set("studyPlans_u1", "[]").unwrap();
    store.remove("missing").unwrap();
    drop(store);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("auth_token").unwrap().as_deref(), Some("abc"));
    assert_eq!(reopened.keys().unwrap(), vec!["auth_token", "studyPlans_u1"]);
}

#[test]
fn test_corrupt_store_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(store.keys().unwrap().is_empty());
    store.set("k", "v").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

fn exam_backend() -> Router {
    Router::new().route(
        "/agents/exam/create/{user_id}",
        post(|| async {
            Json(json!({
                "success": true,
                "result": {
                    "questions": [
                        { "id": 1, "question": "2+2?", "type": "mcq", "options": ["3", "4"], "correct_answer": "4" }
                    ]
                }
            }))
        }),
    )
}

#[tokio::test]
async fn test_client_state_persists_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = common::spawn_backend(exam_backend()).await;
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::test_default()
    }
    .with_api_url(base_url);

    let (plan_id, exam_id) = {
        let client =
            EduClient::open(config.clone(), Arc::new(RecordingNotifier::new())).unwrap();
        common::log_in(&client, "u1");
        let resource: Resource =
            serde_json::from_value(json!({ "id": "r1", "title": "Notes" })).unwrap();
        client.curator.save(&resource).unwrap();
        // Starter paths are written on first read.
        assert_eq!(client.learning_paths.list().unwrap().len(), 2);

        // The planner route is missing, so this stores a local schedule.
        let form = PlanForm {
            title: "Calc".to_string(),
            subject: "Math".to_string(),
            ..Default::default()
        };
        let plan = client.planner.create(&form).await.unwrap();

        let exam = client
            .exams
            .generate(&ExamForm {
                subject: "Math".to_string(),
                topic: "Sums".to_string(),
                question_count: 1,
                time_limit: 5,
                ..Default::default()
            })
            .await
            .unwrap();
        let mut attempt = client.exams.attempt(&exam.id).unwrap();
        attempt.start(Utc::now()).unwrap();
        attempt.answer(0, "4").unwrap();
        client.exams.complete(&mut attempt).await.unwrap();

        (plan.value().id.clone(), exam.id)
    };

    let client = EduClient::open(config, Arc::new(RecordingNotifier::new())).unwrap();
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().current_user_id(), "u1");
    assert_eq!(client.curator.saved().unwrap().len(), 1);

    let plans = client.planner.list().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].id, plan_id);
    assert_eq!(client.exams.exams().unwrap()[0].id, exam_id);
    let history = client.exams.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, 100);

    // Reading again must not reseed or duplicate anything.
    assert_eq!(client.learning_paths.list().unwrap().len(), 2);
    assert_eq!(client.learning_paths.list().unwrap().len(), 2);

    let stats = client.profile.stats().unwrap();
    assert_eq!(stats.resources_saved, 1);
    assert_eq!(stats.learning_paths, 2);
    assert_eq!(stats.study_sessions, 1);
    assert_eq!(stats.exams_taken, 1);
}

#[test]
fn test_collections_are_keyed_by_feature_and_user() {
    let t = common::offline_client();
    let resource: Resource =
        serde_json::from_value(json!({ "id": "r1", "title": "Notes" })).unwrap();

    // No session at all: the demo user owns the data.
    t.client.curator.save(&resource).unwrap();
    assert!(t.store.get("savedResources_demo-user").unwrap().is_some());

    common::log_in(&t.client, "u9");
    t.client.curator.save(&resource).unwrap();
    assert!(t
        .store
        .get(&keys::user_key(keys::SAVED_RESOURCES, "u9"))
        .unwrap()
        .is_some());
}

#[test]
fn test_corrupt_collection_reads_as_empty() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");
    t.store.set("savedResources_u1", "not json").unwrap();
    t.store.set("studyPlans_u1", "{\"object\": true}").unwrap();

    assert!(t.client.curator.saved().unwrap().is_empty());
    assert!(t.client.planner.list().unwrap().is_empty());
}

#[test]
fn test_memory_store_is_shared_between_clones() {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn KeyValueStore> = store.clone();
    shared.set("user_id", "u1").unwrap();
    assert_eq!(store.get("user_id").unwrap().as_deref(), Some("u1"));
    assert_eq!(store.len(), 1);
}
