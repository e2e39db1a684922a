// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study plan models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{flex, GoalList};
use crate::storage::Record;

/// Stored study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    #[serde(deserialize_with = "flex::string")]
    pub id: String,
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub duration_weeks: u32,
    #[serde(default)]
    pub hours_per_day: u32,
    #[serde(default)]
    pub difficulty_level: String,
    #[serde(default)]
    pub goals: Vec<String>,
    /// Planner result, either from the server or synthesized locally
    #[serde(default)]
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

impl Record for StudyPlan {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

impl StudyPlan {
    /// Interpret the stored result as a schedule, when it has that shape.
    pub fn schedule(&self) -> Option<GeneratedPlan> {
        serde_json::from_value(self.result.clone()).ok()
    }
}

/// A planner result with a day-by-day schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    #[serde(default, deserialize_with = "flex::string")]
    pub plan_id: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub duration_days: u32,
    /// Tasks keyed by ISO date (`YYYY-MM-DD`)
    pub daily_schedule: BTreeMap<String, Vec<ScheduledTask>>,
    #[serde(default)]
    pub weekly_goals: Vec<String>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub learning_tips: Vec<String>,
    #[serde(default)]
    pub saved: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quota_limited: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// One study session in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub topic: String,
    pub subject: String,
    pub duration_minutes: u32,
    pub priority: String,
    pub activity: String,
    pub time: String,
}

/// Inputs of the "New Plan" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanForm {
    pub title: String,
    pub subject: String,
    pub duration_weeks: u32,
    pub hours_per_day: u32,
    pub difficulty_level: String,
    pub goals: GoalList,
}

impl Default for PlanForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            duration_weeks: 4,
            hours_per_day: 2,
            difficulty_level: "intermediate".to_string(),
            goals: GoalList::new(),
        }
    }
}

/// Inputs of the one-off "generate a plan" form (not persisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickPlanForm {
    pub subject: String,
    pub goal: String,
    /// e.g. "2 weeks", "1 month"
    pub timeframe: String,
    /// e.g. "2 hours", "5+ hours"
    pub study_hours: String,
    pub current_level: String,
    pub learning_style: String,
    pub topics: Vec<String>,
}

impl Default for QuickPlanForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            goal: String::new(),
            timeframe: String::new(),
            study_hours: String::new(),
            current_level: "beginner".to_string(),
            learning_style: "visual".to_string(),
            topics: Vec::new(),
        }
    }
}

impl QuickPlanForm {
    /// Add a topic; blank and duplicate topics are ignored.
    pub fn add_topic(&mut self, topic: &str) {
        let topic = topic.trim();
        if !topic.is_empty() && !self.topics.iter().any(|t| t == topic) {
            self.topics.push(topic.to_string());
        }
    }

    pub fn remove_topic(&mut self, topic: &str) {
        self.topics.retain(|t| t != topic);
    }

    /// Days covered by the selected timeframe label.
    pub fn days(&self) -> u32 {
        match self.timeframe.as_str() {
            "1 week" => 7,
            "2 weeks" => 14,
            "1 month" => 30,
            "2 months" => 60,
            "3 months" => 90,
            _ => 14,
        }
    }

    /// Daily hours for the selected label.
    pub fn daily_hours(&self) -> u32 {
        match self.study_hours.as_str() {
            "1 hour" => 1,
            "2 hours" => 2,
            "3 hours" => 3,
            "4 hours" => 4,
            "5+ hours" => 5,
            _ => 2,
        }
    }
}
