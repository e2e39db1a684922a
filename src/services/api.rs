// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EduVerse API client.
//!
//! Handles:
//! - Bearer token on every request when logged in
//! - Forced logout and login redirect on 401
//! - Rate limit detection (429)
//! - Mapping page-level inputs to the backend's request shapes
//!
//! There is exactly one attempt per call. Fallback data is the business of
//! the feature services.

use reqwest::multipart;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, UserProfile};
use crate::routes::Navigator;
use crate::services::session::SessionService;

/// EduVerse API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionService,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionService, navigator: Navigator) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `<prefix>/<current user id>`
    fn user_path(&self, prefix: &str) -> String {
        format!(
            "{}/{}",
            prefix,
            urlencoding::encode(&self.session.current_user_id())
        )
    }

    // ─── Auth ────────────────────────────────────────────────────────────────

    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse> {
        self.post_json("/auth/register", request).await
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        self.post_json("/auth/login", credentials).await
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<ProfileEnvelope> {
        let path = format!("/auth/profile/{}", urlencoding::encode(user_id));
        self.get_json(&path).await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<ProfileEnvelope> {
        let path = format!("/auth/profile/{}", urlencoding::encode(user_id));
        self.put_json(&path, update).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<AgentEnvelope> {
        self.post_json("/auth/change-password", request).await
    }

    // ─── Agents ──────────────────────────────────────────────────────────────

    pub async fn tutor_query(&self, query: &TutorQuery) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/tutor");
        self.post_json(&path, &query.to_request()).await
    }

    pub async fn create_study_plan(&self, query: &PlannerQuery) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/planner");
        self.post_json(&path, &query.to_request()).await
    }

    pub async fn search_resources(&self, query: &CuratorQuery) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/curator");
        self.post_json(&path, &query.to_request()).await
    }

    pub async fn create_exam(&self, query: &ExamQuery) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/exam/create");
        self.post_json(&path, &query.to_request()).await
    }

    pub async fn evaluate_exam(&self, submission: &ExamSubmission) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/exam/evaluate");
        self.post_json(&path, submission).await
    }

    pub async fn analyze_syllabus_file(&self, upload: SyllabusUpload) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/syllabus/analyze");
        let form = upload.into_form()?;
        self.post_multipart(&path, form).await
    }

    pub async fn analyze_syllabus_text(&self, request: &SyllabusTextRequest) -> Result<AgentEnvelope> {
        let path = self.user_path("/agents/syllabus/analyze-text");
        self.post_json(&path, request).await
    }

    pub async fn learning_paths(&self) -> Result<Value> {
        let path = self.user_path("/agents/syllabus/paths");
        self.get_json(&path).await
    }

    pub async fn learning_path_resources(&self, path_id: &str) -> Result<Value> {
        let path = format!("/agents/syllabus/resources/{}", urlencoding::encode(path_id));
        self.get_json(&path).await
    }

    pub async fn agent_status(&self) -> Result<Value> {
        self.get_json("/agents/status").await
    }

    pub async fn health(&self) -> Result<Value> {
        self.get_json("/health").await
    }

    // ─── Transport ───────────────────────────────────────────────────────────

    /// Generic GET request with JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path));
        self.send(request).await
    }

    /// Generic POST request with JSON body and response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.post(self.url(path)).json(body);
        self.send(request).await
    }

    /// Generic PUT request with JSON body and response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.put(self.url(path)).json(body);
        self.send(request).await
    }

    /// POST a multipart form.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T> {
        let request = self.http.post(self.url(path)).multipart(form);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Network(format!("Request timed out: {}", e))
            } else {
                AppError::Network(e.to_string())
            }
        })?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                tracing::warn!(url = %self.base_url, "API rejected credentials (401)");
                if let Err(e) = self.session.clear_credentials() {
                    tracing::error!(error = %e, "Failed to clear credentials");
                }
                self.navigator.force_login();
                return Err(AppError::Unauthorized);
            }

            if status.as_u16() == 429 {
                tracing::warn!("EduVerse rate limit hit (429)");
                return Err(AppError::RateLimited(error_detail(&body)));
            }

            return Err(AppError::Api(format!(
                "HTTP {}: {}",
                status,
                error_detail(&body)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Api(format!("JSON parse error: {}", e)))
    }
}

/// Pull a human-readable message out of an error body.
fn error_detail(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("detail")
                .and_then(Value::as_str)
                .or_else(|| v.get("message").and_then(Value::as_str))
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Response envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Common `{success, agent, result, ...}` reply from the agent endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
    /// Plain-text answer some agents send instead of `result`
    #[serde(default)]
    pub response: Option<String>,
}

impl AgentEnvelope {
    /// `result.error`, when the agent reported one inside a 2xx reply.
    pub fn result_error(&self) -> Option<&str> {
        self.result.as_ref()?.get("error")?.as_str()
    }
}

/// Reply of the profile endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request mapping
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Tutor question as the page phrases it.
#[derive(Debug, Clone, Default)]
pub struct TutorQuery {
    pub query: Option<String>,
    pub topic: Option<String>,
    pub subject: Option<String>,
    pub difficulty_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorRequest {
    pub topic: String,
    pub subject: String,
    pub difficulty_level: String,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl TutorQuery {
    pub fn to_request(&self) -> TutorRequest {
        TutorRequest {
            topic: non_empty(&self.query)
                .or_else(|| non_empty(&self.topic))
                .unwrap_or_default(),
            subject: non_empty(&self.subject).unwrap_or_else(|| "general".to_string()),
            difficulty_level: non_empty(&self.difficulty_level)
                .unwrap_or_else(|| "medium".to_string()),
        }
    }
}

/// Planner inputs; any of the field spellings the pages use.
#[derive(Debug, Clone, Default)]
pub struct PlannerQuery {
    pub subjects: Vec<String>,
    pub subject: Option<String>,
    pub days_ahead: Option<u32>,
    pub daily_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerRequest {
    pub subjects: Vec<String>,
    pub days_ahead: u32,
    pub daily_hours: u32,
}

impl PlannerQuery {
    pub fn to_request(&self) -> PlannerRequest {
        let subjects = if self.subjects.is_empty() {
            non_empty(&self.subject).into_iter().collect()
        } else {
            self.subjects.clone()
        };
        PlannerRequest {
            subjects,
            days_ahead: self.days_ahead.filter(|d| *d > 0).unwrap_or(7),
            daily_hours: self.daily_hours.filter(|h| *h > 0).unwrap_or(2),
        }
    }
}

/// Resource search inputs.
#[derive(Debug, Clone, Default)]
pub struct CuratorQuery {
    pub query: Option<String>,
    pub topic: Option<String>,
    pub subject: Option<String>,
    pub resource_types: Option<Vec<String>>,
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratorRequest {
    pub topic: String,
    pub subject: String,
    pub resource_types: Vec<String>,
}

impl CuratorQuery {
    pub fn to_request(&self) -> CuratorRequest {
        let resource_types = self
            .resource_types
            .clone()
            .filter(|types| !types.is_empty())
            .or_else(|| non_empty(&self.resource_type).map(|t| vec![t]))
            .unwrap_or_else(|| {
                ["video", "article", "course"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });
        CuratorRequest {
            topic: non_empty(&self.query)
                .or_else(|| non_empty(&self.topic))
                .unwrap_or_default(),
            subject: non_empty(&self.subject).unwrap_or_else(|| "general".to_string()),
            resource_types,
        }
    }
}

/// Exam generation inputs.
#[derive(Debug, Clone, Default)]
pub struct ExamQuery {
    pub topic: String,
    pub subject: String,
    pub question_count: Option<u32>,
    pub difficulty: Option<String>,
    pub question_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamRequest {
    pub topic: String,
    pub subject: String,
    pub question_count: u32,
    pub difficulty: String,
    pub question_types: Vec<String>,
}

impl ExamQuery {
    pub fn to_request(&self) -> ExamRequest {
        ExamRequest {
            topic: self.topic.clone(),
            subject: self.subject.clone(),
            question_count: self.question_count.filter(|c| *c > 0).unwrap_or(10),
            difficulty: non_empty(&self.difficulty).unwrap_or_else(|| "medium".to_string()),
            question_types: self
                .question_types
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| vec!["mcq".to_string(), "short_answer".to_string()]),
        }
    }
}

/// Answers sent to the evaluation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamSubmission {
    pub exam_id: String,
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub user_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyllabusTextRequest {
    pub syllabus_content: String,
    pub subject: String,
    pub course_name: String,
    pub difficulty_level: String,
}

/// File upload for the syllabus analyzer.
#[derive(Debug, Clone)]
pub struct SyllabusUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub subject: String,
    pub course_name: String,
    pub difficulty_level: String,
}

impl SyllabusUpload {
    fn into_form(self) -> Result<multipart::Form> {
        let part = multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| AppError::Validation(format!("Invalid file type: {}", e)))?;

        Ok(multipart::Form::new()
            .part("file", part)
            .text("subject", self.subject)
            .text("course_name", self.course_name)
            .text("difficulty_level", self.difficulty_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutor_query_defaults() {
        let request = TutorQuery {
            query: Some("What is a derivative?".to_string()),
            topic: Some("ignored".to_string()),
            ..Default::default()
        }
        .to_request();
        assert_eq!(request.topic, "What is a derivative?");
        assert_eq!(request.subject, "general");
        assert_eq!(request.difficulty_level, "medium");
    }

    #[test]
    fn test_planner_query_defaults() {
        let request = PlannerQuery {
            subject: Some("Physics".to_string()),
            ..Default::default()
        }
        .to_request();
        assert_eq!(request.subjects, vec!["Physics".to_string()]);
        assert_eq!(request.days_ahead, 7);
        assert_eq!(request.daily_hours, 2);
    }

    #[test]
    fn test_curator_resource_types() {
        let base = CuratorQuery {
            topic: Some("Algebra".to_string()),
            ..Default::default()
        };
        assert_eq!(
            base.to_request().resource_types,
            vec!["video", "article", "course"]
        );

        let single = CuratorQuery {
            resource_type: Some("book".to_string()),
            ..base.clone()
        };
        assert_eq!(single.to_request().resource_types, vec!["book"]);

        let explicit = CuratorQuery {
            resource_types: Some(vec!["podcast".to_string()]),
            resource_type: Some("book".to_string()),
            ..base
        };
        assert_eq!(explicit.to_request().resource_types, vec!["podcast"]);
    }

    #[test]
    fn test_exam_query_defaults() {
        let request = ExamQuery {
            topic: "Calculus".to_string(),
            subject: "Mathematics".to_string(),
            ..Default::default()
        }
        .to_request();
        assert_eq!(request.question_count, 10);
        assert_eq!(request.difficulty, "medium");
        assert_eq!(request.question_types, vec!["mcq", "short_answer"]);
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_detail(r#"{"message": "nope"}"#), "nope");
        assert_eq!(error_detail("plain"), "plain");
    }

    #[test]
    fn test_result_error() {
        let envelope: AgentEnvelope = serde_json::from_value(serde_json::json!({
            "success": true,
            "result": {"error": "429 quota exceeded"}
        }))
        .unwrap();
        assert_eq!(envelope.result_error(), Some("429 quota exceeded"));
    }
}
