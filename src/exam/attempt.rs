// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! State of one attempt at an exam.
//!
//! Every operation that is illegal for the current state returns
//! [`AppError::InvalidTransition`] rather than panicking. Ticks are the
//! exception: outside of `InProgress` they are ignored, so an expired
//! attempt finishes exactly once.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::scoring;
use crate::error::{AppError, Result};
use crate::models::{Exam, ExamResult, Question};

#[derive(Debug, Clone, PartialEq)]
pub enum ExamAttempt {
    NotStarted {
        exam: Exam,
    },
    InProgress {
        exam: Exam,
        started_at: DateTime<Utc>,
        remaining_secs: u64,
        answers: BTreeMap<usize, String>,
        cursor: usize,
    },
    Finished {
        result: ExamResult,
    },
}

/// What one line of typed input did to an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Continue,
    /// The student asked to submit.
    Submit,
    /// The attempt is no longer in progress, e.g. the timer ran out.
    Closed,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Running(u64),
    Expired(ExamResult),
    Idle,
}

impl ExamAttempt {
    pub fn new(exam: Exam) -> Self {
        ExamAttempt::NotStarted { exam }
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            ExamAttempt::NotStarted { .. } => "not_started",
            ExamAttempt::InProgress { .. } => "in_progress",
            ExamAttempt::Finished { .. } => "finished",
        }
    }

    fn invalid(&self, action: &str) -> AppError {
        AppError::InvalidTransition(format!("cannot {} an exam that is {}", action, self.state_name()))
    }

    /// NotStarted → InProgress with the full time limit.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        let ExamAttempt::NotStarted { exam } = self else {
            return Err(self.invalid("start"));
        };
        let remaining_secs = exam.time_limit_secs();
        let exam = exam.clone();

        tracing::debug!(exam_id = %exam.id, remaining_secs, "Exam started");
        *self = ExamAttempt::InProgress {
            exam,
            started_at: now,
            remaining_secs,
            answers: BTreeMap::new(),
            cursor: 0,
        };
        Ok(())
    }

    /// Record (or overwrite) the answer to question `index`.
    pub fn answer(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let count = self.question_count();
        let ExamAttempt::InProgress { answers, .. } = self else {
            return Err(self.invalid("answer"));
        };
        if index >= count {
            return Err(AppError::Validation(format!(
                "Question {} does not exist (exam has {})",
                index + 1,
                count
            )));
        }
        answers.insert(index, text.into());
        Ok(())
    }

    /// Move to the next question; stays on the last one.
    pub fn next(&mut self) -> Result<usize> {
        let count = self.question_count();
        let ExamAttempt::InProgress { cursor, .. } = self else {
            return Err(self.invalid("navigate"));
        };
        if *cursor + 1 < count {
            *cursor += 1;
        }
        Ok(*cursor)
    }

    /// Move to the previous question; stays on the first one.
    pub fn previous(&mut self) -> Result<usize> {
        let ExamAttempt::InProgress { cursor, .. } = self else {
            return Err(self.invalid("navigate"));
        };
        *cursor = cursor.saturating_sub(1);
        Ok(*cursor)
    }

    /// Apply a line typed during the attempt. `:q` submits, `:n` and `:p`
    /// move, a number picks that multiple-choice option and any other text
    /// answers the current question and moves on.
    pub fn apply_input(&mut self, line: &str) -> Result<Input> {
        if !self.is_in_progress() {
            return Ok(Input::Closed);
        }
        match line.trim() {
            ":q" => Ok(Input::Submit),
            ":n" => self.next().map(|_| Input::Continue),
            ":p" => self.previous().map(|_| Input::Continue),
            "" => Ok(Input::Continue),
            text => {
                let Some(cursor) = self.cursor() else {
                    return Ok(Input::Closed);
                };
                let answer = self
                    .current_question()
                    .filter(|q| q.is_multiple_choice())
                    .and_then(|q| q.options.as_ref())
                    .and_then(|options| {
                        text.parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(|i| options.get(i).cloned())
                    })
                    .unwrap_or_else(|| text.to_string());
                self.answer(cursor, answer)?;
                self.next()?;
                Ok(Input::Continue)
            }
        }
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        let ExamAttempt::InProgress { remaining_secs, .. } = self else {
            return Tick::Idle;
        };
        *remaining_secs = remaining_secs.saturating_sub(1);
        if *remaining_secs > 0 {
            return Tick::Running(*remaining_secs);
        }

        match self.finish(now) {
            Ok(result) => {
                tracing::info!(exam_id = %result.exam_id, score = result.score, "Exam time expired");
                Tick::Expired(result)
            }
            Err(_) => Tick::Idle,
        }
    }

    /// InProgress → Finished. Returns the graded result.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<ExamResult> {
        let ExamAttempt::InProgress {
            exam,
            remaining_secs,
            answers,
            ..
        } = self
        else {
            return Err(self.invalid("finish"));
        };

        let result = scoring::grade(exam, answers, *remaining_secs, now);
        *self = ExamAttempt::Finished {
            result: result.clone(),
        };
        Ok(result)
    }

    pub fn exam(&self) -> Option<&Exam> {
        match self {
            ExamAttempt::NotStarted { exam } | ExamAttempt::InProgress { exam, .. } => Some(exam),
            ExamAttempt::Finished { .. } => None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.exam().map_or(0, |exam| exam.questions.len())
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, ExamAttempt::InProgress { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ExamAttempt::Finished { .. })
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        match self {
            ExamAttempt::InProgress { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            ExamAttempt::InProgress { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    /// Question under the cursor.
    pub fn current_question(&self) -> Option<&Question> {
        match self {
            ExamAttempt::InProgress { exam, cursor, .. } => exam.questions.get(*cursor),
            _ => None,
        }
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        match self {
            ExamAttempt::InProgress { answers, .. } => answers.get(&index).map(String::as_str),
            _ => None,
        }
    }

    pub fn answered_count(&self) -> usize {
        match self {
            ExamAttempt::InProgress { answers, .. } => answers.len(),
            _ => 0,
        }
    }

    /// Answers keyed by question index.
    pub fn answers(&self) -> Option<&BTreeMap<usize, String>> {
        match self {
            ExamAttempt::InProgress { answers, .. } => Some(answers),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ExamResult> {
        match self {
            ExamAttempt::Finished { result } => Some(result),
            _ => None,
        }
    }
}
