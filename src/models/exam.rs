// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exam and exam result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flex;
use crate::storage::Record;

/// A generated practice exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(deserialize_with = "flex::string")]
    pub id: String,
    pub subject: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub question_count: u32,
    /// Time limit in minutes
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default)]
    pub question_types: Vec<String>,
    /// Raw exam-coach result
    #[serde(default)]
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Record for Exam {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

impl Exam {
    /// Time limit in seconds.
    pub fn time_limit_secs(&self) -> u64 {
        u64::from(self.time_limit) * 60
    }
}

/// One exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, deserialize_with = "flex::string")]
    pub id: String,
    pub question: String,
    /// "mcq", "text", "short_answer", ...
    #[serde(rename = "type", default = "default_question_type")]
    pub kind: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: serde_json::Value,
}

fn default_question_type() -> String {
    "text".to_string()
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        self.kind == "mcq"
    }
}

/// Inputs of the "Generate Exam" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamForm {
    pub subject: String,
    pub topic: String,
    pub difficulty: String,
    pub question_count: u32,
    /// Minutes
    pub time_limit: u32,
    pub question_types: Vec<String>,
}

impl Default for ExamForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            topic: String::new(),
            difficulty: "intermediate".to_string(),
            question_count: 10,
            time_limit: 30,
            question_types: vec!["mcq".to_string()],
        }
    }
}

/// Archived outcome of a finished attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(deserialize_with = "flex::string")]
    pub id: String,
    #[serde(deserialize_with = "flex::string")]
    pub exam_id: String,
    pub subject: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    /// Integer percentage in [0, 100]
    pub score: u32,
    pub correct_answers: usize,
    pub total_questions: usize,
    /// Minutes spent
    pub time_taken: u64,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub question_results: Vec<QuestionResult>,
    #[serde(default)]
    pub feedback: String,
}

impl Record for ExamResult {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

/// Per-question breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    #[serde(default, deserialize_with = "flex::string")]
    pub question_id: String,
    pub question: String,
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: serde_json::Value,
}
