// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Syllabus analyzer.
//!
//! Accepts a syllabus as an uploaded file or pasted text. When the analyzer
//! is unreachable a rough local analysis is produced instead.

use std::path::Path;

use chrono::{DateTime, Utc};

use super::api::{AgentEnvelope, SyllabusTextRequest, SyllabusUpload};
use super::{require, ServiceContext};
use crate::error::{AppError, Result};
use crate::models::syllabus::{SyllabusPath, SyllabusResource, SyllabusTopic};
use crate::models::{AnalysisSummary, SavedAnalysis, SyllabusAnalysis, SyllabusResult};
use crate::outcome::{DegradedReason, Sourced};
use crate::storage::{keys, UserCollection};
use crate::time_utils::millis_id;

const DEFAULT_SUBJECT: &str = "General";
const DEFAULT_COURSE: &str = "Course Analysis";
const DEFAULT_DIFFICULTY: &str = "intermediate";

/// Accepted upload types, by extension.
const ACCEPTED_TYPES: [(&str, &str); 3] = [
    ("pdf", "application/pdf"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
];

/// MIME type for an accepted syllabus file.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ACCEPTED_TYPES
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, mime)| *mime)
}

fn resource(id: u32, title: &str, kind: &str, relevance: f64) -> SyllabusResource {
    SyllabusResource {
        id: id.to_string(),
        title: title.to_string(),
        kind: kind.to_string(),
        relevance_score: Some(relevance),
    }
}

/// Local analysis of pasted text: the first five fragments between
/// `, . ; :` become the topics.
pub fn local_text_analysis(request: &SyllabusTextRequest, now: DateTime<Utc>) -> SyllabusResult {
    let topics = request
        .syllabus_content
        .split([',', '.', ';', ':'])
        .take(5)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| SyllabusTopic {
            name: t.to_string(),
            description: format!("Study materials and resources for {}", t),
        })
        .collect();

    SyllabusResult {
        analysis_id: millis_id(now),
        analysis_overview: Some(format!(
            "Analysis of {} course covering key topics in {}",
            request.course_name, request.subject
        )),
        learning_path: Some(SyllabusPath {
            title: format!("{} Learning Path", request.course_name),
            difficulty: Some(request.difficulty_level.clone()),
            duration: Some("8-12 weeks".to_string()),
            topics,
            resources: vec![
                resource(1, "Course Textbook", "book", 95.0),
                resource(2, "Online Lectures", "video", 88.0),
                resource(3, "Practice Problems", "exercise", 92.0),
            ],
        }),
    }
}

/// Local analysis of an uploaded file.
pub fn local_file_analysis(now: DateTime<Utc>) -> SyllabusResult {
    let topic = |name: &str, description: &str| SyllabusTopic {
        name: name.to_string(),
        description: description.to_string(),
    };

    SyllabusResult {
        analysis_id: millis_id(now),
        analysis_overview: Some("Syllabus analysis completed successfully".to_string()),
        learning_path: Some(SyllabusPath {
            title: "Generated Learning Path".to_string(),
            difficulty: Some(DEFAULT_DIFFICULTY.to_string()),
            duration: Some("8 weeks".to_string()),
            topics: vec![
                topic("Introduction to Subject", "Basic concepts and fundamentals"),
                topic("Core Concepts", "Main principles and theories"),
                topic("Advanced Topics", "Complex subjects and applications"),
            ],
            resources: vec![
                resource(1, "Course Materials", "article", 95.0),
                resource(2, "Video Lectures", "video", 90.0),
            ],
        }),
    }
}

pub struct SyllabusService {
    ctx: ServiceContext,
    analyses: UserCollection<SavedAnalysis>,
}

impl SyllabusService {
    pub fn new(ctx: ServiceContext) -> Self {
        let analyses = ctx.collection(keys::SYLLABUS_ANALYSES);
        Self { ctx, analyses }
    }

    /// Analyze pasted syllabus text.
    pub async fn analyze_text(&self, text: &str) -> Result<Sourced<SyllabusAnalysis>> {
        if require(text, "Syllabus text").is_err() {
            self.ctx.notifier.error("Please enter syllabus text");
            return Err(AppError::Validation("Syllabus text is required".to_string()));
        }

        let request = SyllabusTextRequest {
            syllabus_content: text.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            course_name: DEFAULT_COURSE.to_string(),
            difficulty_level: DEFAULT_DIFFICULTY.to_string(),
        };

        let sourced = match self.ctx.api.analyze_syllabus_text(&request).await {
            Ok(envelope) => Sourced::Live(self.parse_envelope(envelope)?),
            Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
            Err(e) => {
                tracing::warn!(error = %e, "Syllabus text analysis failed, analyzing locally");
                Sourced::degraded(
                    local_text_analysis(&request, Utc::now()),
                    DegradedReason::Unavailable(e.to_string()),
                )
            }
        };

        self.store(sourced)
    }

    /// Analyze a syllabus file (`.pdf`, `.docx` or `.txt`).
    pub async fn analyze_file(&self, path: &Path) -> Result<Sourced<SyllabusAnalysis>> {
        let Some(mime_type) = mime_type_for(path) else {
            self.ctx.notifier.error("Please upload a PDF, DOCX, or TXT file");
            return Err(AppError::Validation(format!(
                "Unsupported syllabus file: {}",
                path.display()
            )));
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.ctx.notifier.error("Please select a file to upload");
                return Err(AppError::Validation(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "syllabus".to_string());

        let upload = SyllabusUpload {
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
            subject: DEFAULT_SUBJECT.to_string(),
            course_name: DEFAULT_COURSE.to_string(),
            difficulty_level: DEFAULT_DIFFICULTY.to_string(),
        };

        let sourced = match self.ctx.api.analyze_syllabus_file(upload).await {
            Ok(envelope) => Sourced::Live(self.parse_envelope(envelope)?),
            Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
            Err(e) => {
                tracing::warn!(error = %e, "Syllabus upload failed, analyzing locally");
                Sourced::degraded(
                    local_file_analysis(Utc::now()),
                    DegradedReason::Unavailable(e.to_string()),
                )
            }
        };

        self.store(sourced)
    }

    fn parse_envelope(&self, envelope: AgentEnvelope) -> Result<SyllabusResult> {
        match envelope.result {
            Some(result) if envelope.success => Ok(serde_json::from_value(result)?),
            _ => {
                self.ctx.notifier.error("Analysis failed - no result returned");
                Err(AppError::Api("Syllabus analyzer returned no result".to_string()))
            }
        }
    }

    fn store(&self, sourced: Sourced<SyllabusResult>) -> Result<Sourced<SyllabusAnalysis>> {
        let now = Utc::now();
        let sourced = sourced.map(|result| {
            let mut analysis = SyllabusAnalysis::from(result);
            if analysis.id.is_empty() {
                analysis.id = millis_id(now);
            }
            analysis
        });

        let analysis = sourced.value().clone();
        self.analyses.push(SavedAnalysis {
            id: analysis.id.clone(),
            timestamp: now,
            analysis,
        })?;

        tracing::info!(
            analysis_id = %sourced.value().id,
            topics = sourced.value().topics.len(),
            degraded = sourced.is_degraded(),
            "Syllabus analyzed"
        );
        self.ctx.notifier.success("Syllabus analyzed successfully!");
        Ok(sourced)
    }

    /// Stored analyses, oldest first.
    pub fn analyses(&self) -> Result<Vec<AnalysisSummary>> {
        Ok(self.analyses.list()?.iter().map(AnalysisSummary::from).collect())
    }

    pub fn saved(&self) -> Result<Vec<SavedAnalysis>> {
        self.analyses.list()
    }
}
