// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study plan creation, regeneration and local schedules.

use axum::{extract::Json as JsonBody, http::StatusCode, routing::post, Json, Router};
use eduverse_client::{
    error::AppError,
    models::{GoalList, PlanForm, QuickPlanForm},
    notify::NoticeLevel,
    DegradedReason,
};
use serde_json::{json, Value};

mod common;

fn form(title: &str, subject: &str, weeks: u32) -> PlanForm {
    PlanForm {
        title: title.to_string(),
        subject: subject.to_string(),
        duration_weeks: weeks,
        hours_per_day: 3,
        goals: GoalList::from_goals(["Limits", ""]),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_live_plan_is_stored_with_request_shape() {
    let app = Router::new().route(
        "/agents/planner/{user_id}",
        post(|JsonBody(body): JsonBody<Value>| async move {
            Json(json!({ "success": true, "result": { "plan_id": "p-1", "echo": body } }))
        }),
    );
    let t = common::client_for(app).await;
    common::log_in(&t.client, "u1");

    let plan = t.client.planner.create(&form("Calc", "Math", 2)).await.unwrap();
    assert!(!plan.is_degraded());

    let sent = &plan.value().result["echo"];
    assert_eq!(sent["subjects"], json!(["Math"]));
    assert_eq!(sent["days_ahead"], 14);
    assert_eq!(sent["daily_hours"], 3);

    let stored = t.client.planner.list().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].goals, vec!["Limits".to_string()]);
    assert_eq!(stored[0].status, "active");
    assert!(t.notifier.contains(NoticeLevel::Success, "Study plan created"));
}

#[tokio::test]
async fn test_quota_limited_plan_uses_local_schedule() {
    let app = Router::new().route(
        "/agents/planner/{user_id}",
        post(|| async {
            Json(json!({
                "success": true,
                "result": { "error": "quota exceeded for today", "plan_id": "server-plan" }
            }))
        }),
    );
    let t = common::client_for(app).await;
    common::log_in(&t.client, "u1");

    let plan = t.client.planner.create(&form("Physics", "Physics", 1)).await.unwrap();
    assert_eq!(plan.reason(), Some(&DegradedReason::QuotaExceeded));

    let schedule = plan.value().schedule().expect("schedule shape");
    assert_eq!(schedule.plan_id, "server-plan");
    assert!(schedule.quota_limited);
    assert_eq!(schedule.duration_days, 7);
    assert_eq!(schedule.daily_schedule.len(), 7);
    for tasks in schedule.daily_schedule.values() {
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].duration_minutes, 108);
        assert_eq!(tasks[1].duration_minutes, 72);
    }
    assert_eq!(t.client.planner.list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_planner_falls_back() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let plan = t.client.planner.create(&form("Bio", "Biology", 2)).await.unwrap();
    assert!(matches!(plan.reason(), Some(DegradedReason::Unavailable(_))));

    let schedule = plan.value().schedule().expect("schedule shape");
    assert!(schedule.plan_id.starts_with("fallback-"));
    assert!(schedule.fallback);
    assert_eq!(schedule.daily_schedule.len(), 14);
    assert_eq!(schedule.focus_areas, vec!["Biology".to_string()]);
}

#[tokio::test]
async fn test_unsuccessful_reply_is_an_error_and_not_stored() {
    let app = Router::new().route(
        "/agents/planner/{user_id}",
        post(|| async { Json(json!({ "success": false, "message": "bad subject" })) }),
    );
    let t = common::client_for(app).await;
    common::log_in(&t.client, "u1");

    let err = t.client.planner.create(&form("X", "Y", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Api(msg) if msg == "bad subject"));
    assert!(t.client.planner.list().unwrap().is_empty());
    assert!(t.notifier.contains(NoticeLevel::Error, "Failed to create study plan"));
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let t = common::offline_client();
    let err = t.client.planner.create(&form("", "Math", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg == "Title is required"));
}

#[tokio::test]
async fn test_regenerate_and_delete() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let created = t.client.planner.create(&form("Chem", "Chemistry", 1)).await.unwrap();
    let id = created.value().id.clone();
    assert!(created.value().updated_at.is_none());

    let regenerated = t.client.planner.regenerate(&id).await.unwrap();
    assert!(regenerated.value().updated_at.is_some());
    assert_eq!(regenerated.value().id, id);

    let missing = t.client.planner.regenerate("nope").await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    assert!(t.client.planner.delete(&id).unwrap());
    assert!(!t.client.planner.delete(&id).unwrap());
    assert!(t.client.planner.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_plan_is_not_stored() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let mut quick = QuickPlanForm {
        subject: "History".to_string(),
        goal: "Pass the final".to_string(),
        timeframe: "1 month".to_string(),
        study_hours: "1 hour".to_string(),
        ..Default::default()
    };
    quick.add_topic("Rome");
    quick.add_topic("Rome");
    assert_eq!(quick.topics.len(), 1);

    let generated = t.client.planner.quick_plan(&quick).await.unwrap();
    assert!(generated.is_degraded());
    assert_eq!(generated.value()["duration_days"], 30);
    assert!(t.client.planner.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_rate_limited_planner_is_reported_as_quota() {
    let app = Router::new().route(
        "/agents/planner/{user_id}",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "detail": "quota exceeded" })),
            )
        }),
    );
    let t = common::client_for(app).await;
    common::log_in(&t.client, "u1");

    let plan = t.client.planner.create(&form("Calc", "Math", 4)).await.unwrap();
    assert_eq!(plan.reason(), Some(&DegradedReason::QuotaExceeded));

    let schedule = plan.value().schedule().expect("schedule shape");
    assert!(schedule.fallback);
    assert!(schedule.plan_id.starts_with("fallback-"));
    assert_eq!(schedule.daily_schedule.len(), 28);
}

#[tokio::test]
async fn test_out_of_range_plan_inputs_are_rejected() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let too_long = form("Calc", "Math", u32::MAX);
    assert!(matches!(
        t.client.planner.create(&too_long).await,
        Err(AppError::Validation(_))
    ));

    let zero_weeks = form("Calc", "Math", 0);
    assert!(matches!(
        t.client.planner.create(&zero_weeks).await,
        Err(AppError::Validation(_))
    ));

    let mut too_many_hours = form("Calc", "Math", 2);
    too_many_hours.hours_per_day = u32::MAX;
    assert!(matches!(
        t.client.planner.create(&too_many_hours).await,
        Err(AppError::Validation(msg)) if msg.starts_with("Hours per day")
    ));
    assert!(t.client.planner.list().unwrap().is_empty());
}
