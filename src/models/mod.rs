// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client.

pub mod exam;
pub mod forms;
pub mod learning_path;
pub mod plan;
pub mod profile;
pub mod resource;
pub mod session;
pub mod syllabus;
pub mod tutor;

pub use exam::{Exam, ExamForm, ExamResult, Question, QuestionResult};
pub use forms::GoalList;
pub use learning_path::{LearningPath, PathForm, PathStatus, PathStep};
pub use plan::{GeneratedPlan, PlanForm, QuickPlanForm, ScheduledTask, StudyPlan};
pub use profile::{ProfileStats, ProfileUpdate, UserProfile};
pub use resource::{Resource, SearchFilters, SearchRecord};
pub use session::{LoginRequest, LoginResponse, RegisterRequest, StoredUser};
pub use syllabus::{AnalysisSummary, SavedAnalysis, SyllabusAnalysis, SyllabusResult};
pub use tutor::{ChatMessage, Speaker, TutorExchange, TutorSession};

/// Deserializers for identifiers the backend sends as either strings or numbers.
pub(crate) mod flex {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Str(s) => s,
                Scalar::Int(n) => n.to_string(),
                Scalar::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    /// String field tolerating numbers and `null` (→ empty).
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<Scalar>::deserialize(deserializer)?
            .map(Scalar::into_string)
            .unwrap_or_default())
    }

    /// Optional string field tolerating numbers.
    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
    }
}
