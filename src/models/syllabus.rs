//! Syllabus analysis models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flex;
use crate::storage::Record;

/// `result` of the syllabus analyzer endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyllabusResult {
    #[serde(default, deserialize_with = "flex::string")]
    pub analysis_id: String,
    #[serde(default)]
    pub analysis_overview: Option<String>,
    #[serde(default)]
    pub learning_path: Option<SyllabusPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyllabusPath {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub topics: Vec<SyllabusTopic>,
    #[serde(default)]
    pub resources: Vec<SyllabusResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyllabusTopic {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyllabusResource {
    #[serde(default, deserialize_with = "flex::string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

/// Analysis as presented and stored by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusAnalysis {
    #[serde(deserialize_with = "flex::string")]
    pub id: String,
    pub overview: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub learning_path: Option<SyllabusPath>,
}

impl From<SyllabusResult> for SyllabusAnalysis {
    fn from(result: SyllabusResult) -> Self {
        let path = result.learning_path;
        Self {
            id: result.analysis_id,
            overview: result
                .analysis_overview
                .unwrap_or_else(|| "Course analysis completed".to_string()),
            topics: path
                .as_ref()
                .map(|p| p.topics.iter().map(|t| t.name.clone()).collect())
                .unwrap_or_default(),
            difficulty: path
                .as_ref()
                .and_then(|p| p.difficulty.clone())
                .unwrap_or_else(|| "intermediate".to_string()),
            duration: path
                .as_ref()
                .and_then(|p| p.duration.clone())
                .unwrap_or_else(|| "Not specified".to_string()),
            learning_path: path,
        }
    }
}

/// Stored analysis entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAnalysis {
    #[serde(deserialize_with = "flex::string")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub analysis: SyllabusAnalysis,
}

impl Record for SavedAnalysis {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

/// Row in the "previous analyses" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub topics: Vec<String>,
    pub difficulty: String,
}

impl From<&SavedAnalysis> for AnalysisSummary {
    fn from(saved: &SavedAnalysis) -> Self {
        Self {
            id: saved.id.clone(),
            title: saved
                .analysis
                .learning_path
                .as_ref()
                .map(|p| p.title.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Learning Path".to_string()),
            timestamp: saved.timestamp,
            topics: saved.analysis.topics.clone(),
            difficulty: saved.analysis.difficulty.clone(),
        }
    }
}
