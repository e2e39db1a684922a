// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Results that may have been synthesized locally.
//!
//! Several features keep working when the backend is unreachable or out of
//! quota by substituting placeholder data. [`Sourced`] carries which path
//! produced the value so callers can label it.

/// Why a feature fell back to local data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    /// The backend signaled an exhausted AI quota or rate limit.
    QuotaExceeded,
    /// The backend answered with an error inside an otherwise successful reply.
    ProcessingError(String),
    /// The request failed (transport error, timeout, 5xx).
    Unavailable(String),
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradedReason::QuotaExceeded => write!(f, "API quota reached"),
            DegradedReason::ProcessingError(msg) => write!(f, "backend processing error: {}", msg),
            DegradedReason::Unavailable(msg) => write!(f, "backend unavailable: {}", msg),
        }
    }
}

/// A value from the server, or a locally synthesized stand-in.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Degraded { value: T, reason: DegradedReason },
}

impl<T> Sourced<T> {
    pub fn degraded(value: T, reason: DegradedReason) -> Self {
        Sourced::Degraded { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Sourced::Live(value) | Sourced::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Sourced::Live(value) | Sourced::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Sourced::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&DegradedReason> {
        match self {
            Sourced::Live(_) => None,
            Sourced::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sourced<U> {
        match self {
            Sourced::Live(value) => Sourced::Live(f(value)),
            Sourced::Degraded { value, reason } => Sourced::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}
