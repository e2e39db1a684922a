// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI tutor conversations.
//!
//! Questions go to the tutor agent. Quota exhaustion and connection problems
//! are answered locally so the conversation can continue.

use chrono::Utc;
use serde_json::Value;

use super::api::{AgentEnvelope, TutorQuery};
use super::{require, ServiceContext};
use crate::error::{mentions_quota, AppError, Result};
use crate::models::TutorSession;
use crate::outcome::{DegradedReason, Sourced};

const PROCESSING_ANSWER: &str = "I'm having trouble processing your request right now. Could you please rephrase your question or try again in a moment?";
const CONNECTION_ANSWER: &str = "I'm having trouble connecting to my knowledge base right now. However, I can still help you! Could you tell me more about what you're trying to learn? I'll do my best to provide guidance based on the information you give me.";
const EMPTY_RESULT_ANSWER: &str =
    "I received your question but couldn't generate a proper response. Could you please rephrase it?";
const NO_RESULT_ANSWER: &str =
    "I apologize, but I couldn't process your question properly. Could you please rephrase it?";
const UNFORMATTED_ANSWER: &str = "I received your question but had trouble formatting the response.";

pub struct TutorService {
    ctx: ServiceContext,
}

impl TutorService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a new conversation.
    pub fn new_session(&self) -> TutorSession {
        TutorSession::new(Utc::now())
    }

    /// Change the conversation focus. Omitted fields keep their value.
    pub fn set_session(
        &self,
        session: &mut TutorSession,
        subject: Option<&str>,
        topic: Option<&str>,
        level: Option<&str>,
    ) {
        session.set_focus(subject, topic, level);
    }

    /// Ask a question and append the exchange to the conversation.
    pub async fn ask(&self, session: &mut TutorSession, question: &str) -> Result<Sourced<String>> {
        require(question, "Question")?;
        let question = question.trim();

        let query = TutorQuery {
            query: Some(question.to_string()),
            topic: Some(session.topic.clone()),
            subject: Some(session.subject.clone()),
            difficulty_level: Some(session.level.clone()),
        };

        let answer = match self.ctx.api.tutor_query(&query).await {
            Ok(envelope) => self.classify(envelope, session, question),
            Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
            Err(e) if e.is_quota_error() => {
                tracing::warn!(error = %e, "Tutor quota reached");
                self.ctx
                    .notifier
                    .error("API quota reached - providing offline assistance");
                Sourced::degraded(quota_answer(session, question), DegradedReason::QuotaExceeded)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Tutor request failed");
                self.ctx
                    .notifier
                    .error("Connection issue - providing offline assistance");
                Sourced::degraded(
                    CONNECTION_ANSWER.to_string(),
                    DegradedReason::Unavailable(e.to_string()),
                )
            }
        };

        session.record(question, answer.value(), Utc::now());
        Ok(answer)
    }

    fn classify(
        &self,
        envelope: AgentEnvelope,
        session: &TutorSession,
        question: &str,
    ) -> Sourced<String> {
        if let Some(error) = envelope.result_error() {
            if mentions_quota(error) {
                self.ctx
                    .notifier
                    .error("API quota reached - providing offline assistance");
                return Sourced::degraded(quota_answer(session, question), DegradedReason::QuotaExceeded);
            }
            tracing::warn!(error, "Tutor agent reported an error");
            self.ctx.notifier.error("Processing error - please try again");
            return Sourced::degraded(
                PROCESSING_ANSWER.to_string(),
                DegradedReason::ProcessingError(error.to_string()),
            );
        }

        let answer = match &envelope.result {
            Some(result) => render_result(result),
            None => envelope
                .response
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| NO_RESULT_ANSWER.to_string()),
        };
        Sourced::Live(answer)
    }
}

/// Offline answer used when the AI quota is exhausted.
fn quota_answer(session: &TutorSession, question: &str) -> String {
    let subject = if session.subject.is_empty() {
        "your topic"
    } else {
        session.subject.as_str()
    };
    format!(
        "I'm currently experiencing high demand and have reached my daily API limit. \
However, I can still help you with \"{question}\"!\n\n\
Here's what I can tell you based on my knowledge:\n\n\
**For {subject}:**\n\
- This appears to be about {lower}\n\
- At {level} level, this typically involves understanding core concepts and applying them practically\n\
- I recommend starting with foundational concepts and building up to more complex applications\n\n\
**Study Tips:**\n\
- Break down complex topics into smaller, manageable parts\n\
- Use active learning techniques like summarizing and teaching others\n\
- Practice with examples and real-world applications\n\
- Don't hesitate to ask follow-up questions!\n\n\
**Next Steps:**\n\
- Try rephrasing your question or asking about specific aspects\n\
- Consider using textbooks, educational videos, or online resources\n\n\
I'll be back to full capacity tomorrow. Thank you for your patience!",
        question = question,
        subject = subject,
        lower = question.to_lowercase(),
        level = session.level,
    )
}

/// Turn a tutor `result` into display text.
fn render_result(result: &Value) -> String {
    match result {
        Value::String(_) => format_tutor_response(result),
        Value::Object(map) => {
            // The explanation is sometimes the whole structured answer, JSON-encoded.
            if let Some(Value::String(explanation)) = map.get("explanation") {
                let parsed = parse_fenced_json(explanation);
                if let Some(inner @ Value::Object(_)) = parsed {
                    return format_tutor_response(&inner);
                }
            }
            let formatted = format_tutor_response(result);
            if formatted == UNFORMATTED_ANSWER {
                if let Some(Value::String(content)) = map.get("content") {
                    return content.clone();
                }
            }
            formatted
        }
        Value::Null => EMPTY_RESULT_ANSWER.to_string(),
        other => other.to_string(),
    }
}

fn strip_json_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```json") {
        Some(rest) => rest.trim().strip_suffix("```").unwrap_or(rest).trim(),
        None => trimmed,
    }
}

fn parse_fenced_json(text: &str) -> Option<Value> {
    serde_json::from_str(strip_json_fence(text)).ok()
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn non_empty_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(Value::as_array).filter(|a| !a.is_empty())
}

/// Render a structured tutor answer as markdown-ish text.
///
/// Strings are parsed as JSON first (with an optional ```` ```json ```` fence);
/// a string that is not JSON is returned as is.
pub fn format_tutor_response(data: &Value) -> String {
    let parsed;
    let data = match data {
        Value::String(text) => match parse_fenced_json(text) {
            Some(value @ Value::Object(_)) => {
                parsed = value;
                &parsed
            }
            _ => return strip_json_fence(text).to_string(),
        },
        other => other,
    };

    let mut out = String::new();

    let explanation = str_field(data, "explanation");
    if !explanation.is_empty() {
        out.push_str(explanation);
        out.push_str("\n\n");
    }

    if let Some(examples) = non_empty_array(data, "examples") {
        out.push_str("📚 **Examples:**\n\n");
        for (index, example) in examples.iter().enumerate() {
            out.push_str(&format!("{}. **{}**\n", index + 1, str_field(example, "title")));
            out.push_str(&format!("   {}\n\n", str_field(example, "description")));
        }
    }

    if let Some(tips) = non_empty_array(data, "learning_tips") {
        out.push_str("💡 **Learning Tips:**\n\n");
        for tip in tips {
            let tip = tip.as_str().map(str::to_string).unwrap_or_else(|| tip.to_string());
            out.push_str(&format!("• {}\n", tip));
        }
        out.push('\n');
    }

    if let Some(resources) = non_empty_array(data, "additional_resources") {
        out.push_str("🔗 **Additional Resources:**\n\n");
        for resource in resources {
            out.push_str(&format!(
                "• [{}]({})\n",
                str_field(resource, "title"),
                str_field(resource, "url")
            ));
        }
    }

    let out = out.trim_end();
    if out.is_empty() {
        UNFORMATTED_ANSWER.to_string()
    } else {
        out.to_string()
    }
}
