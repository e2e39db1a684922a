//! Tutor chat models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hello! I'm your AI tutor. I'm here to help you learn and understand any topic. What would you like to study today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    #[serde(rename = "type")]
    pub speaker: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A question and the answer shown for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorExchange {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

/// In-memory state of one tutoring conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorSession {
    pub subject: String,
    pub topic: String,
    pub level: String,
    pub messages: Vec<ChatMessage>,
    pub exchanges: Vec<TutorExchange>,
}

impl TutorSession {
    /// New conversation opened by the tutor's greeting.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            subject: String::new(),
            topic: String::new(),
            level: "intermediate".to_string(),
            messages: vec![ChatMessage {
                id: 1,
                speaker: Speaker::Ai,
                content: GREETING.to_string(),
                timestamp: now,
            }],
            exchanges: Vec::new(),
        }
    }

    /// Update only the provided fields.
    pub fn set_focus(&mut self, subject: Option<&str>, topic: Option<&str>, level: Option<&str>) {
        if let Some(subject) = subject.filter(|s| !s.is_empty()) {
            self.subject = subject.to_string();
        }
        if let Some(topic) = topic.filter(|s| !s.is_empty()) {
            self.topic = topic.to_string();
        }
        if let Some(level) = level.filter(|s| !s.is_empty()) {
            self.level = level.to_string();
        }
    }

    /// Record a question and its answer.
    pub fn record(&mut self, question: &str, answer: &str, now: DateTime<Utc>) {
        let next_id = self.messages.last().map(|m| m.id + 1).unwrap_or(1);
        self.messages.push(ChatMessage {
            id: next_id,
            speaker: Speaker::User,
            content: question.to_string(),
            timestamp: now,
        });
        self.messages.push(ChatMessage {
            id: next_id + 1,
            speaker: Speaker::Ai,
            content: answer.to_string(),
            timestamp: now,
        });
        self.exchanges.push(TutorExchange {
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp: now,
        });
    }
}
