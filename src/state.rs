//! Per-request retry bookkeeping.

use std::time::{Duration, Instant};

/// Retry state for one logical request: how many resubmissions have been
/// issued and when the most recent physical send started.
///
/// Owned by the request-handling task for the whole retry lifecycle, so it
/// persists across resubmissions of the same logical request and is never
/// shared between distinct requests. Recording a send never resets the count.
#[derive(Debug, Default)]
pub struct RetryState {
    retry_count: u32,
    last_request_time: Option<Instant>,
}

impl RetryState {
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Stamp the current time as the start of a physical send. Called before
    /// every attempt, initial and resubmitted alike.
    pub fn record_send(&mut self) {
        self.last_request_time = Some(Instant::now());
    }

    /// Time since the previous send started, if one was recorded.
    pub fn elapsed_since_last_send(&self) -> Option<Duration> {
        self.last_request_time.map(|t| t.elapsed())
    }

    /// Count one more resubmission. The orchestrator checks the retry budget
    /// before calling this.
    pub fn increment(&mut self) {
        self.retry_count += 1;
    }
}
