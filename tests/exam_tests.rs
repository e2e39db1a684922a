// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exam attempts, the countdown and the exam coach service.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use axum::{extract::Json as JsonBody, routing::post, Json, Router};
use chrono::Utc;
use eduverse_client::{
    error::AppError,
    exam::{Countdown, ExamAttempt, Input, Tick},
    models::{Exam, ExamForm, Question},
    notify::NoticeLevel,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;

mod common;

fn question(id: &str, correct: Option<&str>) -> Question {
    Question {
        id: id.to_string(),
        question: format!("Question {}", id),
        kind: "mcq".to_string(),
        options: Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
        correct_answer: correct.map(str::to_string),
        explanation: Value::Null,
    }
}

fn exam(time_limit: u32) -> Exam {
    Exam {
        id: "exam-1".to_string(),
        subject: "Math".to_string(),
        topic: "Limits".to_string(),
        difficulty: "intermediate".to_string(),
        question_count: 3,
        time_limit,
        question_types: vec!["mcq".to_string()],
        result: Value::Null,
        created_at: Utc::now(),
        questions: vec![
            question("q1", Some("A")),
            question("q2", Some("B")),
            question("q3", None),
        ],
    }
}

#[test]
fn test_attempt_lifecycle() {
    let mut attempt = ExamAttempt::new(exam(1));
    assert_eq!(attempt.state_name(), "not_started");
    assert!(matches!(attempt.answer(0, "A"), Err(AppError::InvalidTransition(_))));
    assert!(matches!(attempt.finish(Utc::now()), Err(AppError::InvalidTransition(_))));

    attempt.start(Utc::now()).unwrap();
    assert!(attempt.is_in_progress());
    assert_eq!(attempt.remaining_secs(), Some(60));
    assert!(matches!(attempt.start(Utc::now()), Err(AppError::InvalidTransition(_))));

    attempt.answer(0, "B").unwrap();
    attempt.answer(0, "A").unwrap();
    attempt.answer(2, "C").unwrap();
    assert!(matches!(attempt.answer(3, "A"), Err(AppError::Validation(_))));
    assert_eq!(attempt.answered_count(), 2);

    assert_eq!(attempt.previous().unwrap(), 0);
    assert_eq!(attempt.next().unwrap(), 1);
    assert_eq!(attempt.next().unwrap(), 2);
    assert_eq!(attempt.next().unwrap(), 2);

    let result = attempt.finish(Utc::now()).unwrap();
    assert!(attempt.is_finished());
    // q1 right, q2 skipped, q3 has no correct answer.
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.total_questions, 3);
    assert_eq!(result.score, 33);
    assert_eq!(result.question_results[1].user_answer, "No answer");
    assert!(!result.question_results[2].is_correct);
    assert_eq!(result.time_taken, 0);

    assert!(matches!(attempt.next(), Err(AppError::InvalidTransition(_))));
    assert_eq!(attempt.tick(Utc::now()), Tick::Idle);
}

#[test]
fn test_ticks_expire_exactly_once() {
    let mut attempt = ExamAttempt::new(exam(1));
    attempt.start(Utc::now()).unwrap();
    attempt.answer(1, "B").unwrap();

    for expected in (1..60).rev() {
        assert_eq!(attempt.tick(Utc::now()), Tick::Running(expected));
    }
    let Tick::Expired(result) = attempt.tick(Utc::now()) else {
        panic!("expected expiry on the last second");
    };
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.time_taken, 1);
    assert_eq!(attempt.tick(Utc::now()), Tick::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_expires_attempt() {
    let mut attempt = ExamAttempt::new(exam(1));
    attempt.start(Utc::now()).unwrap();
    attempt.answer(0, "A").unwrap();
    let attempt = Arc::new(Mutex::new(attempt));

    let mut countdown = Countdown::spawn(attempt.clone());

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    assert_eq!(attempt.lock().await.remaining_secs(), Some(30));

    let result = countdown.expired().await.expect("countdown should expire");
    assert_eq!(result.score, 33);
    assert!(attempt.lock().await.is_finished());
    assert!(countdown.expired().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_countdown_stops_when_finished_early() {
    let mut attempt = ExamAttempt::new(exam(5));
    attempt.start(Utc::now()).unwrap();
    let attempt = Arc::new(Mutex::new(attempt));

    let mut countdown = Countdown::spawn(attempt.clone());
    tokio::time::sleep(Duration::from_millis(3_500)).await;
    attempt.lock().await.finish(Utc::now()).unwrap();

    assert!(countdown.expired().await.is_none());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(countdown.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_countdown_survives_select_cancellation() {
    let mut attempt = ExamAttempt::new(exam(1));
    attempt.start(Utc::now()).unwrap();
    let attempt = Arc::new(Mutex::new(attempt));
    let mut countdown = Countdown::spawn(attempt.clone());

    tokio::select! {
        _ = countdown.expired() => panic!("expired too early"),
        _ = tokio::time::sleep(Duration::from_secs(10)) => {}
    }

    assert!(countdown.expired().await.is_some());
}

fn exam_app(evaluations: Arc<StdMutex<Vec<Value>>>) -> Router {
    Router::new()
        .route(
            "/agents/exam/create/{user_id}",
            post(|JsonBody(body): JsonBody<Value>| async move {
                Json(json!({
                    "success": true,
                    "result": {
                        "topic": body["topic"],
                        "questions": [
                            { "id": 1, "question": "2+2?", "type": "mcq", "options": ["3", "4"], "correct_answer": "4" },
                            { "id": 2, "question": "Capital of France?", "correct_answer": "Paris" }
                        ]
                    }
                }))
            }),
        )
        .route(
            "/agents/exam/evaluate/{user_id}",
            post(move |JsonBody(body): JsonBody<Value>| {
                let evaluations = evaluations.clone();
                async move {
                    evaluations.lock().unwrap().push(body);
                    Json(json!({ "success": true, "result": {} }))
                }
            }),
        )
}

fn form() -> ExamForm {
    ExamForm {
        subject: "General".to_string(),
        topic: "Trivia".to_string(),
        question_count: 2,
        time_limit: 10,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_take_and_complete() {
    let evaluations = Arc::new(StdMutex::new(Vec::new()));
    let t = common::client_for(exam_app(evaluations.clone())).await;
    common::log_in(&t.client, "u1");

    let exam = t.client.exams.generate(&form()).await.unwrap();
    assert_eq!(exam.questions.len(), 2);
    assert_eq!(exam.questions[0].id, "1");
    assert_eq!(exam.questions[1].kind, "text");
    assert_eq!(t.client.exams.exams().unwrap().len(), 1);

    let mut attempt = t.client.exams.attempt(&exam.id).unwrap();
    attempt.start(Utc::now()).unwrap();
    attempt.answer(0, "4").unwrap();
    attempt.answer(1, "paris").unwrap();

    let result = t.client.exams.complete(&mut attempt).await.unwrap();
    assert_eq!(result.score, 50);
    assert_eq!(result.feedback, "Keep studying and try again.");

    let history = t.client.exams.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].exam_id, exam.id);
    assert!(t.notifier.contains(NoticeLevel::Success, "Exam completed! Score: 50% (1/2)"));

    let sent = evaluations.lock().unwrap()[0].clone();
    assert_eq!(sent["exam_id"], json!(exam.id));
    assert_eq!(sent["answers"][0]["question_id"], "1");
    assert_eq!(sent["answers"][1]["user_answer"], "paris");
}

#[tokio::test]
async fn test_completion_survives_unreachable_evaluator() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let mut attempt = ExamAttempt::new(exam(5));
    attempt.start(Utc::now()).unwrap();
    attempt.answer(0, "A").unwrap();
    attempt.answer(1, "B").unwrap();

    let result = t.client.exams.complete(&mut attempt).await.unwrap();
    assert_eq!(result.score, 67);
    assert_eq!(t.client.exams.history().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unanswered_exam_scores_zero() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let mut attempt = ExamAttempt::new(exam(5));
    attempt.start(Utc::now()).unwrap();

    let result = t.client.exams.complete(&mut attempt).await.unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.correct_answers, 0);
    assert!(result.question_results.iter().all(|q| q.user_answer == "No answer"));
    assert_eq!(t.client.exams.history().unwrap()[0].score, 0);
}

#[test]
fn test_typed_input_drives_attempt() {
    let mut attempt = ExamAttempt::new(exam(5));
    attempt.start(Utc::now()).unwrap();

    assert_eq!(attempt.apply_input("2").unwrap(), Input::Continue);
    assert_eq!(attempt.answer_for(0), Some("B"));
    assert_eq!(attempt.cursor(), Some(1));

    assert_eq!(attempt.apply_input(":p").unwrap(), Input::Continue);
    assert_eq!(attempt.cursor(), Some(0));
    assert_eq!(attempt.apply_input(":n").unwrap(), Input::Continue);
    assert_eq!(attempt.apply_input("free text").unwrap(), Input::Continue);
    assert_eq!(attempt.answer_for(1), Some("free text"));
    assert_eq!(attempt.apply_input(":q").unwrap(), Input::Submit);
}

#[tokio::test]
async fn test_input_after_expiry_still_archives_result() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");

    let mut attempt = ExamAttempt::new(exam(1));
    attempt.start(Utc::now()).unwrap();
    attempt.answer(0, "A").unwrap();
    while !matches!(attempt.tick(Utc::now()), Tick::Expired(_)) {}

    // Keys typed in the same moment the timer fired.
    for line in [":n", ":p", "1", ""] {
        assert_eq!(attempt.apply_input(line).unwrap(), Input::Closed);
    }

    let result = t.client.exams.complete(&mut attempt).await.unwrap();
    assert_eq!(result.score, 33);
    assert_eq!(t.client.exams.history().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_exam_is_not_found() {
    let t = common::offline_client();
    assert!(matches!(t.client.exams.attempt("missing"), Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_generation_failure_stores_nothing() {
    let t = common::offline_client();
    common::log_in(&t.client, "u1");
    assert!(t.client.exams.generate(&form()).await.is_err());
    assert!(t.client.exams.exams().unwrap().is_empty());
    assert!(t.notifier.contains(NoticeLevel::Error, "Failed to generate exam"));
}
