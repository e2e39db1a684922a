// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exam coach: generated exams, attempts and result history.

use chrono::Utc;
use serde_json::Value;

use super::api::{ExamQuery, ExamSubmission, SubmittedAnswer};
use super::{require, ServiceContext};
use crate::error::{AppError, Result};
use crate::exam::ExamAttempt;
use crate::models::{Exam, ExamForm, ExamResult, Question};
use crate::storage::{keys, UserCollection};
use crate::time_utils::millis_id;

/// Questions from an exam-coach result, or a single placeholder question
/// carrying the raw result when none are structured.
pub fn questions_from_result(result: &Value) -> Vec<Question> {
    if let Some(raw) = result.get("questions").filter(|q| q.is_array()) {
        match serde_json::from_value::<Vec<Question>>(raw.clone()) {
            Ok(questions) if !questions.is_empty() => return questions,
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Exam questions are malformed, using placeholder"),
        }
    }

    vec![Question {
        id: "1".to_string(),
        question: "Sample question based on AI result".to_string(),
        kind: "text".to_string(),
        options: None,
        correct_answer: Some("Based on AI analysis".to_string()),
        explanation: result.clone(),
    }]
}

/// Evaluation payload for a graded attempt.
fn submission_for(exam_id: &str, result: &ExamResult, answered: &[usize]) -> ExamSubmission {
    ExamSubmission {
        exam_id: exam_id.to_string(),
        answers: answered
            .iter()
            .filter_map(|index| {
                result.question_results.get(*index).map(|q| SubmittedAnswer {
                    question_id: if q.question_id.is_empty() {
                        index.to_string()
                    } else {
                        q.question_id.clone()
                    },
                    user_answer: q.user_answer.clone(),
                })
            })
            .collect(),
    }
}

pub struct ExamCoachService {
    ctx: ServiceContext,
    exams: UserCollection<Exam>,
    history: UserCollection<ExamResult>,
}

impl ExamCoachService {
    pub fn new(ctx: ServiceContext) -> Self {
        let exams = ctx.collection(keys::EXAMS);
        let history = ctx.collection(keys::EXAM_HISTORY);
        Self { ctx, exams, history }
    }

    /// Generate an exam and add it to the practice list.
    pub async fn generate(&self, form: &ExamForm) -> Result<Exam> {
        require(&form.subject, "Subject")?;
        require(&form.topic, "Topic")?;

        let query = ExamQuery {
            topic: form.topic.trim().to_string(),
            subject: form.subject.trim().to_string(),
            question_count: Some(form.question_count),
            difficulty: Some(form.difficulty.clone()),
            question_types: Some(form.question_types.clone()),
        };

        let envelope = match self.ctx.api.create_exam(&query).await {
            Ok(envelope) if envelope.success => envelope,
            Ok(envelope) => {
                self.ctx.notifier.error("Failed to generate exam");
                return Err(AppError::Api(
                    envelope
                        .message
                        .unwrap_or_else(|| "Exam coach returned an error".to_string()),
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Exam generation failed");
                self.ctx.notifier.error("Failed to generate exam");
                return Err(e);
            }
        };

        let now = Utc::now();
        let result = envelope.result.unwrap_or(Value::Null);
        let exam = Exam {
            id: millis_id(now),
            subject: query.subject,
            topic: query.topic,
            difficulty: form.difficulty.clone(),
            question_count: form.question_count,
            time_limit: form.time_limit,
            question_types: form.question_types.clone(),
            questions: questions_from_result(&result),
            result,
            created_at: now,
        };

        self.exams.push(exam.clone())?;
        tracing::info!(exam_id = %exam.id, questions = exam.questions.len(), "Exam generated");
        self.ctx.notifier.success("Exam generated successfully!");
        Ok(exam)
    }

    pub fn exams(&self) -> Result<Vec<Exam>> {
        self.exams.list()
    }

    /// Finished attempts, newest first.
    pub fn history(&self) -> Result<Vec<ExamResult>> {
        self.history.list()
    }

    pub fn exam(&self, exam_id: &str) -> Result<Exam> {
        self.exams
            .get(exam_id)?
            .ok_or_else(|| AppError::NotFound(format!("exam {}", exam_id)))
    }

    /// A fresh, not yet started attempt at a stored exam.
    pub fn attempt(&self, exam_id: &str) -> Result<ExamAttempt> {
        Ok(ExamAttempt::new(self.exam(exam_id)?))
    }

    /// Finish an attempt (if still running), submit it for evaluation and
    /// archive the result.
    ///
    /// Evaluation is best effort; the locally computed score is what gets
    /// stored.
    pub async fn complete(&self, attempt: &mut ExamAttempt) -> Result<ExamResult> {
        let answered: Vec<usize> = attempt
            .answers()
            .map(|answers| answers.keys().copied().collect())
            .unwrap_or_default();

        let result = match attempt.result().cloned() {
            Some(result) => result,
            None => attempt.finish(Utc::now())?,
        };

        // An attempt that expired on its own no longer carries the answer map.
        let answered = if answered.is_empty() {
            result
                .question_results
                .iter()
                .enumerate()
                .filter(|(_, q)| q.user_answer != "No answer")
                .map(|(index, _)| index)
                .collect()
        } else {
            answered
        };

        let submission = submission_for(&result.exam_id, &result, &answered);
        match self.ctx.api.evaluate_exam(&submission).await {
            Ok(envelope) if envelope.success => {
                self.ctx.notifier.success("Exam evaluated successfully!");
            }
            Ok(_) => tracing::debug!("Backend evaluation unsuccessful, using local evaluation"),
            Err(e) => {
                tracing::debug!(error = %e, "Backend evaluation not available, using local evaluation")
            }
        }

        self.history.prepend(result.clone())?;
        tracing::info!(
            exam_id = %result.exam_id,
            score = result.score,
            time_taken = result.time_taken,
            "Exam completed"
        );
        self.ctx.notifier.success(&format!(
            "Exam completed! Score: {}% ({}/{})",
            result.score, result.correct_answers, result.total_questions
        ));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_questions() {
        let result = json!({
            "questions": [
                {"id": 1, "question": "2+2?", "type": "mcq", "options": ["3", "4"], "correct_answer": "4"},
                {"question": "Define force", "type": "short_answer"}
            ]
        });
        let questions = questions_from_result(&result);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "1");
        assert!(questions[0].is_multiple_choice());
        assert_eq!(questions[1].correct_answer, None);
    }

    #[test]
    fn test_placeholder_question() {
        let result = json!({"exam_text": "Some exam"});
        let questions = questions_from_result(&result);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "1");
        assert_eq!(questions[0].kind, "text");
        assert_eq!(questions[0].correct_answer.as_deref(), Some("Based on AI analysis"));
        assert_eq!(questions[0].explanation, result);

        assert_eq!(questions_from_result(&json!({"questions": []})).len(), 1);
        assert_eq!(questions_from_result(&json!("text")).len(), 1);
    }
}
