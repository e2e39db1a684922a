//! Curated resource models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flex;
use crate::storage::Record;

/// A learning resource from a curator search or the saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "flex::string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(rename = "savedAt", default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Record for Resource {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

/// Search filters on the curator page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub subject: String,
    pub resource_type: String,
    pub difficulty_level: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            subject: String::new(),
            resource_type: "all".to_string(),
            difficulty_level: "all".to_string(),
        }
    }
}

/// Entry in the recent-search history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub query: String,
    pub filters: SearchFilters,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "resultsCount")]
    pub results_count: usize,
}

impl Record for SearchRecord {
    fn record_id(&self) -> String {
        self.timestamp.to_rfc3339()
    }
}
