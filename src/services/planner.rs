// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study planner.
//!
//! Plans are generated by the planner agent and stored per user. When the
//! agent is out of quota or unreachable a simple rotating schedule is built
//! locally instead, so plan creation still succeeds.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;

use super::api::PlannerQuery;
use super::{require, ServiceContext};
use crate::error::{mentions_quota, AppError, Result};
use crate::models::{GeneratedPlan, PlanForm, QuickPlanForm, ScheduledTask, StudyPlan};
use crate::outcome::{DegradedReason, Sourced};
use crate::storage::{keys, UserCollection};
use crate::time_utils::{date_key, format_utc_rfc3339, millis_id};

const DEFAULT_SUBJECT: &str = "General";
/// Longest plan the form accepts.
pub const MAX_PLAN_WEEKS: u32 = 52;
pub const MAX_HOURS_PER_DAY: u32 = 24;

/// Which local stand-in to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockKind {
    /// The agent answered but was out of quota.
    QuotaLimited,
    /// The request itself failed.
    Fallback,
}

/// Two sessions per day, rotating through `subjects`.
pub fn mock_schedule(
    subjects: &[String],
    days: u32,
    hours_per_day: u32,
    start: NaiveDate,
) -> BTreeMap<String, Vec<ScheduledTask>> {
    let default_subjects = [DEFAULT_SUBJECT.to_string()];
    let subjects = if subjects.is_empty() {
        &default_subjects[..]
    } else {
        subjects
    };
    let minutes = hours_per_day.saturating_mul(60);

    (0..days)
        .map(|day| {
            let subject = &subjects[day as usize % subjects.len()];
            let date = start + Duration::days(i64::from(day));
            let tasks = vec![
                ScheduledTask {
                    topic: format!("{} - Theory & Concepts", subject),
                    subject: subject.clone(),
                    duration_minutes: minutes * 6 / 10,
                    priority: "high".to_string(),
                    activity: "study".to_string(),
                    time: "09:00".to_string(),
                },
                ScheduledTask {
                    topic: format!("{} - Practice & Exercises", subject),
                    subject: subject.clone(),
                    duration_minutes: minutes * 4 / 10,
                    priority: "medium".to_string(),
                    activity: "practice".to_string(),
                    time: "14:00".to_string(),
                },
            ];
            (date_key(date), tasks)
        })
        .collect()
}

/// A complete locally generated plan.
pub fn mock_plan(
    kind: MockKind,
    subjects: &[String],
    days: u32,
    hours_per_day: u32,
    now: DateTime<Utc>,
) -> GeneratedPlan {
    let joined = subjects.join(", ");
    let (prefix, weekly_goals, learning_tips) = match kind {
        MockKind::QuotaLimited => (
            "mock",
            vec![
                format!("Master {}", joined),
                "Complete daily study targets".to_string(),
                "Review and practice regularly".to_string(),
            ],
            vec![
                "Stay consistent with daily study".to_string(),
                "Take short breaks every hour".to_string(),
                "Review previous day material".to_string(),
            ],
        ),
        MockKind::Fallback => (
            "fallback",
            vec![format!("Study {}", joined), "Complete daily targets".to_string()],
            vec![
                "Create a study routine".to_string(),
                "Use active learning techniques".to_string(),
            ],
        ),
    };

    GeneratedPlan {
        plan_id: format!("{}-{}", prefix, millis_id(now)),
        start_date: format_utc_rfc3339(now),
        end_date: format_utc_rfc3339(now + Duration::days(i64::from(days))),
        duration_days: days,
        daily_schedule: mock_schedule(subjects, days, hours_per_day, now.date_naive()),
        weekly_goals,
        total_hours: f64::from(hours_per_day),
        focus_areas: subjects.to_vec(),
        learning_tips,
        saved: false,
        quota_limited: kind == MockKind::QuotaLimited,
        fallback: kind == MockKind::Fallback,
    }
}

pub struct PlannerService {
    ctx: ServiceContext,
    plans: UserCollection<StudyPlan>,
}

impl PlannerService {
    pub fn new(ctx: ServiceContext) -> Self {
        let plans = ctx.collection(keys::STUDY_PLANS);
        Self { ctx, plans }
    }

    pub fn list(&self) -> Result<Vec<StudyPlan>> {
        self.plans.list()
    }

    /// Create and store a plan from the "New Plan" form.
    pub async fn create(&self, form: &PlanForm) -> Result<Sourced<StudyPlan>> {
        require(&form.title, "Title")?;
        require(&form.subject, "Subject")?;
        if !(1..=MAX_PLAN_WEEKS).contains(&form.duration_weeks) {
            return Err(AppError::Validation(format!(
                "Duration must be between 1 and {} weeks",
                MAX_PLAN_WEEKS
            )));
        }
        if !(1..=MAX_HOURS_PER_DAY).contains(&form.hours_per_day) {
            return Err(AppError::Validation(format!(
                "Hours per day must be between 1 and {}",
                MAX_HOURS_PER_DAY
            )));
        }

        let query = PlannerQuery {
            subjects: vec![form.subject.clone()],
            days_ahead: Some(form.duration_weeks * 7),
            daily_hours: Some(form.hours_per_day),
            ..Default::default()
        };

        let generated = match self.generate(&query).await {
            Ok(generated) => generated,
            Err(e) => {
                self.ctx
                    .notifier
                    .error("Failed to create study plan - please try again");
                return Err(e);
            }
        };

        let now = Utc::now();
        let sourced = generated.map(|result| StudyPlan {
            id: millis_id(now),
            title: form.title.trim().to_string(),
            subject: form.subject.trim().to_string(),
            duration_weeks: form.duration_weeks,
            hours_per_day: form.hours_per_day,
            difficulty_level: form.difficulty_level.clone(),
            goals: form.goals.submitted(),
            result,
            created_at: now,
            updated_at: None,
            status: "active".to_string(),
        });

        self.plans.push(sourced.value().clone())?;
        tracing::info!(
            plan_id = %sourced.value().id,
            degraded = sourced.is_degraded(),
            "Study plan created"
        );
        self.ctx.notifier.success("Study plan created successfully!");
        Ok(sourced)
    }

    /// Ask for a new schedule for an existing plan.
    pub async fn regenerate(&self, plan_id: &str) -> Result<Sourced<StudyPlan>> {
        let plan = self
            .plans
            .get(plan_id)?
            .ok_or_else(|| AppError::NotFound(format!("study plan {}", plan_id)))?;

        let query = PlannerQuery {
            subjects: vec![plan.subject.clone()],
            days_ahead: Some(plan.duration_weeks.min(MAX_PLAN_WEEKS) * 7),
            daily_hours: Some(plan.hours_per_day.min(MAX_HOURS_PER_DAY)),
            ..Default::default()
        };

        let generated = match self.generate(&query).await {
            Ok(generated) => generated,
            Err(e) => {
                self.ctx
                    .notifier
                    .error("Failed to generate schedule - please try again");
                return Err(e);
            }
        };

        let now = Utc::now();
        let result = generated.value().clone();
        let updated = self
            .plans
            .update(plan_id, |plan| {
                plan.result = result;
                plan.updated_at = Some(now);
            })?
            .ok_or_else(|| AppError::NotFound(format!("study plan {}", plan_id)))?;

        self.ctx.notifier.success("Schedule regenerated successfully!");
        Ok(generated.map(|_| updated))
    }

    pub fn delete(&self, plan_id: &str) -> Result<bool> {
        let removed = self.plans.delete(plan_id)?;
        if removed {
            tracing::info!(plan_id, "Study plan deleted");
        }
        Ok(removed)
    }

    /// One-off plan from the quick form. Not stored.
    pub async fn quick_plan(&self, form: &QuickPlanForm) -> Result<Sourced<Value>> {
        require(&form.subject, "Subject")?;
        require(&form.goal, "Goal")?;

        let query = PlannerQuery {
            subjects: vec![form.subject.clone()],
            days_ahead: Some(form.days()),
            daily_hours: Some(form.daily_hours()),
            ..Default::default()
        };

        match self.generate(&query).await {
            Ok(generated) => {
                self.ctx.notifier.success("Study plan generated successfully!");
                Ok(generated)
            }
            Err(e) => {
                self.ctx
                    .notifier
                    .error("Failed to generate study plan. Please try again.");
                Err(e)
            }
        }
    }

    /// Call the planner agent and classify the reply.
    async fn generate(&self, query: &PlannerQuery) -> Result<Sourced<Value>> {
        let request = query.to_request();
        let now = Utc::now();

        match self.ctx.api.create_study_plan(query).await {
            Ok(envelope) => {
                if let Some(error) = envelope.result_error() {
                    if mentions_quota(error) {
                        tracing::warn!(error, "Planner quota reached, using local schedule");
                        let mut plan = mock_plan(
                            MockKind::QuotaLimited,
                            &request.subjects,
                            request.days_ahead,
                            request.daily_hours,
                            now,
                        );
                        if let Some(id) = envelope
                            .result
                            .as_ref()
                            .and_then(|r| r.get("plan_id"))
                            .and_then(Value::as_str)
                        {
                            plan.plan_id = id.to_string();
                        }
                        return Ok(Sourced::degraded(
                            serde_json::to_value(plan)?,
                            DegradedReason::QuotaExceeded,
                        ));
                    }
                }

                if !envelope.success {
                    return Err(AppError::Api(
                        envelope
                            .message
                            .unwrap_or_else(|| "Planner returned an error".to_string()),
                    ));
                }
                Ok(Sourced::Live(envelope.result.unwrap_or(Value::Null)))
            }
            Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
            Err(e) => {
                tracing::warn!(error = %e, "Planner request failed, using local schedule");
                let plan = mock_plan(
                    MockKind::Fallback,
                    &request.subjects,
                    request.days_ahead,
                    request.daily_hours,
                    now,
                );
                let reason = if e.is_quota_error() {
                    DegradedReason::QuotaExceeded
                } else {
                    DegradedReason::Unavailable(e.to_string())
                };
                Ok(Sourced::degraded(serde_json::to_value(plan)?, reason))
            }
        }
    }
}
