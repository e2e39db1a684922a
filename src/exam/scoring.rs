// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exam grading.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{Exam, ExamResult, QuestionResult};
use crate::time_utils::millis_id;

const NO_ANSWER: &str = "No answer";

/// `round(100 * part / total)` with halves rounded up; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u32
}

/// Feedback line for a score.
pub fn feedback(score: u32) -> &'static str {
    if score >= 80 {
        "Excellent work!"
    } else if score >= 60 {
        "Good job! Keep practicing."
    } else {
        "Keep studying and try again."
    }
}

/// Minutes spent, rounded to the nearest minute.
pub fn minutes_taken(time_limit_secs: u64, remaining_secs: u64) -> u64 {
    let elapsed = time_limit_secs.saturating_sub(remaining_secs);
    (elapsed + 30) / 60
}

fn is_correct(answer: Option<&String>, correct: Option<&String>) -> bool {
    match (answer, correct) {
        (Some(answer), Some(correct)) => answer == correct,
        _ => false,
    }
}

/// Grade an attempt.
///
/// A question counts as correct only when an answer was given and it is
/// exactly equal to the stored correct answer.
pub fn grade(
    exam: &Exam,
    answers: &BTreeMap<usize, String>,
    remaining_secs: u64,
    now: DateTime<Utc>,
) -> ExamResult {
    let question_results: Vec<QuestionResult> = exam
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let answer = answers.get(&index);
            QuestionResult {
                question_id: question.id.clone(),
                question: question.question.clone(),
                user_answer: answer.cloned().unwrap_or_else(|| NO_ANSWER.to_string()),
                correct_answer: question.correct_answer.clone(),
                is_correct: is_correct(answer, question.correct_answer.as_ref()),
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let correct_answers = question_results.iter().filter(|r| r.is_correct).count();
    let total_questions = exam.questions.len();
    let score = percentage(correct_answers, total_questions);

    ExamResult {
        id: millis_id(now),
        exam_id: exam.id.clone(),
        subject: exam.subject.clone(),
        topic: exam.topic.clone(),
        difficulty: exam.difficulty.clone(),
        score,
        correct_answers,
        total_questions,
        time_taken: minutes_taken(exam.time_limit_secs(), remaining_secs),
        completed_at: now,
        question_results,
        feedback: feedback(score).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(0, 3), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(5, 3), 100);
    }

    #[test]
    fn test_feedback_thresholds() {
        assert_eq!(feedback(100), "Excellent work!");
        assert_eq!(feedback(80), "Excellent work!");
        assert_eq!(feedback(79), "Good job! Keep practicing.");
        assert_eq!(feedback(60), "Good job! Keep practicing.");
        assert_eq!(feedback(59), "Keep studying and try again.");
    }

    #[test]
    fn test_minutes_taken() {
        assert_eq!(minutes_taken(1800, 1800), 0);
        assert_eq!(minutes_taken(1800, 1771), 0);
        assert_eq!(minutes_taken(1800, 1770), 1);
        assert_eq!(minutes_taken(1800, 0), 30);
        assert_eq!(minutes_taken(60, 120), 0);
    }

    #[test]
    fn test_missing_correct_answer_never_matches() {
        let answer = "x".to_string();
        assert!(!is_correct(Some(&answer), None));
        assert!(!is_correct(None, None));
        assert!(is_correct(Some(&answer), Some(&answer)));
    }
}
