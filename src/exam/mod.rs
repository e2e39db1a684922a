// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timed exam attempts.

pub mod attempt;
pub mod countdown;
pub mod scoring;

pub use attempt::{ExamAttempt, Input, Tick};
pub use countdown::Countdown;
