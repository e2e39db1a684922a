// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Learning path models and the built-in starter paths.

use serde::{Deserialize, Serialize};

use super::GoalList;
use crate::storage::Record;

/// Where the user is with a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    #[default]
    Available,
    Active,
    Completed,
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PathStatus::Available => "available",
            PathStatus::Active => "active",
            PathStatus::Completed => "completed",
        })
    }
}

/// A learning path with ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: u64,
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub difficulty_level: String,
    #[serde(default)]
    pub estimated_duration: String,
    #[serde(default)]
    pub status: PathStatus,
    /// Percentage of completed steps
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub steps_count: u32,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub steps: Vec<PathStep>,
}

impl Record for LearningPath {
    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

impl LearningPath {
    /// Recompute progress and status from the step flags.
    pub fn recompute_progress(&mut self) {
        let total = self.steps.len();
        let done = self.steps.iter().filter(|s| s.completed).count();
        self.progress = crate::exam::scoring::percentage(done, total);
        self.status = if self.progress == 100 {
            PathStatus::Completed
        } else {
            PathStatus::Active
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Inputs of the "Create Path" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathForm {
    pub title: String,
    pub subject: String,
    pub difficulty_level: String,
    pub estimated_duration: String,
    pub goals: GoalList,
}

impl Default for PathForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            difficulty_level: "intermediate".to_string(),
            estimated_duration: "4 weeks".to_string(),
            goals: GoalList::new(),
        }
    }
}

fn steps(items: &[(&str, &str)]) -> Vec<PathStep> {
    items
        .iter()
        .zip(1u64..)
        .map(|((title, description), id)| PathStep {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        })
        .collect()
}

/// Starter paths offered to users with nothing stored yet.
pub fn default_paths() -> Vec<LearningPath> {
    vec![
        LearningPath {
            id: 1,
            title: "Introduction to Machine Learning".to_string(),
            subject: "Computer Science".to_string(),
            difficulty_level: "intermediate".to_string(),
            estimated_duration: "8 weeks".to_string(),
            status: PathStatus::Available,
            progress: 0,
            steps_count: 12,
            goals: vec![
                "Understand basic ML concepts and algorithms".to_string(),
                "Learn Python for data science".to_string(),
                "Build your first ML model".to_string(),
                "Master data preprocessing techniques".to_string(),
            ],
            steps: steps(&[
                ("Introduction to ML", "Learn the fundamentals of machine learning"),
                ("Python for Data Science", "Master Python libraries like NumPy and Pandas"),
                ("Data Preprocessing", "Clean and prepare data for ML models"),
                ("Linear Regression", "Build your first regression model"),
                ("Classification Algorithms", "Learn decision trees and random forests"),
                ("Model Evaluation", "Evaluate and improve model performance"),
            ]),
        },
        LearningPath {
            id: 2,
            title: "Web Development Fundamentals".to_string(),
            subject: "Web Development".to_string(),
            difficulty_level: "beginner".to_string(),
            estimated_duration: "6 weeks".to_string(),
            status: PathStatus::Available,
            progress: 0,
            steps_count: 10,
            goals: vec![
                "Master HTML, CSS, and JavaScript".to_string(),
                "Build responsive web pages".to_string(),
                "Understand web development workflow".to_string(),
                "Create interactive user interfaces".to_string(),
            ],
            steps: steps(&[
                ("HTML Basics", "Learn HTML structure and elements"),
                ("CSS Styling", "Style web pages with CSS"),
                ("JavaScript Fundamentals", "Add interactivity with JavaScript"),
                ("Responsive Design", "Create mobile-friendly layouts"),
                ("DOM Manipulation", "Interact with web page elements"),
                ("Forms and Validation", "Handle user input and validation"),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recompute_progress() {
        let mut path = default_paths().remove(0);
        path.steps[0].completed = true;
        path.recompute_progress();
        assert_eq!(path.progress, 17);
        assert_eq!(path.status, PathStatus::Active);

        path.steps.iter_mut().for_each(|s| s.completed = true);
        path.recompute_progress();
        assert_eq!(path.progress, 100);
        assert_eq!(path.status, PathStatus::Completed);
    }

    #[test]
    fn test_no_steps_means_zero_progress() {
        let mut path = default_paths().remove(1);
        path.steps.clear();
        path.recompute_progress();
        assert_eq!(path.progress, 0);
        assert_eq!(path.status, PathStatus::Active);
    }
}
