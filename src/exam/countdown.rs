// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-second exam countdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use super::attempt::{ExamAttempt, Tick};
use crate::models::ExamResult;

const TICK: Duration = Duration::from_secs(1);

/// Background task ticking a shared attempt.
///
/// The task stops on its own once the attempt leaves `InProgress`. Dropping
/// the handle aborts it.
pub struct Countdown {
    handle: JoinHandle<()>,
    expired: Option<oneshot::Receiver<ExamResult>>,
}

impl Countdown {
    pub fn spawn(attempt: Arc<Mutex<ExamAttempt>>) -> Self {
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            loop {
                interval.tick().await;
                let tick = attempt.lock().await.tick(Utc::now());
                match tick {
                    Tick::Running(_) => {}
                    Tick::Expired(result) => {
                        let _ = tx.send(result);
                        break;
                    }
                    Tick::Idle => break,
                }
            }
        });

        Self {
            handle,
            expired: Some(rx),
        }
    }

    /// Wait for the time limit to run out.
    ///
    /// Returns `None` if the attempt was finished some other way, the
    /// countdown was cancelled, or the result was already taken. Safe to use
    /// as a `select!` branch: dropping the future keeps the receiver.
    pub async fn expired(&mut self) -> Option<ExamResult> {
        let rx = self.expired.as_mut()?;
        let result = rx.await.ok();
        self.expired = None;
        result
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
