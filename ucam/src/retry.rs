//! Bounded retry shared by the handshake, command and transfer engines

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Error, Result};

/// Outcome of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt<T> {
    Done(T),
    Retry,
}

/// How often and how patiently to retry
///
/// The pause after failed attempt `n` (0-based) is `delay + n * step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
    pub step: Duration,

    /// Give up once this much time has passed, whatever the attempt count
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    pub const fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            step: Duration::ZERO,
            deadline: None,
        }
    }

    /// 10 attempts, 50 ms apart
    pub const fn commands() -> Self {
        Self::new(10, Duration::from_millis(50))
    }

    /// 10 stalls, 100 ms apart
    pub const fn stream() -> Self {
        Self::new(10, Duration::from_millis(100))
    }

    /// Retry immediately
    pub const fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Pause after failed attempt `attempt` (0-based)
    pub fn delay_for(&self, attempt: usize) -> Duration {
        self.delay + self.step * attempt as u32
    }

    fn past_deadline(&self, started: Instant) -> bool {
        self.deadline.is_some_and(|d| started.elapsed() >= d)
    }

    /// Run `op` until it is done, fails or the budget runs out
    ///
    /// `op` gets the 0-based attempt number. Errors from `op` end the run
    /// immediately. Running out of attempts or time gives
    /// [`Error::MaxRetriesExceeded`] tagged with `operation`.
    pub fn run<T>(
        &self,
        operation: &'static str,
        mut op: impl FnMut(usize) -> Result<Attempt<T>>,
    ) -> Result<T> {
        let started = Instant::now();
        let mut attempts = 0;

        while attempts < self.max_attempts && !self.past_deadline(started) {
            let attempt = attempts;
            attempts += 1;

            if let Attempt::Done(value) = op(attempt)? {
                return Ok(value);
            }

            trace!(operation, attempt = attempts, "Attempt failed");

            if attempts < self.max_attempts {
                thread::sleep(self.delay_for(attempt));
            }
        }

        Err(Error::MaxRetriesExceeded {
            operation,
            attempts,
        })
    }

    /// Budget for reads that may stall; see [`StallBudget`]
    pub fn stall_budget(&self, operation: &'static str) -> StallBudget {
        StallBudget {
            policy: *self,
            operation,
            stalls: 0,
            started: Instant::now(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::commands()
    }
}

/// Counts consecutive reads that brought no data
///
/// Any progress resets the count, so long transfers are bounded by how
/// long the line stays idle, not by their size.
#[derive(Debug)]
pub struct StallBudget {
    policy: RetryPolicy,
    operation: &'static str,
    stalls: usize,
    started: Instant,
}

impl StallBudget {
    /// Record an empty read and wait before the next one
    pub fn stalled(&mut self) -> Result<()> {
        let stall = self.stalls;
        self.stalls += 1;

        if self.stalls >= self.policy.max_attempts || self.policy.past_deadline(self.started) {
            return Err(Error::MaxRetriesExceeded {
                operation: self.operation,
                attempts: self.stalls,
            });
        }

        thread::sleep(self.policy.delay_for(stall));
        Ok(())
    }

    pub fn progressed(&mut self) {
        self.stalls = 0;
    }

    pub fn stalls(&self) -> usize {
        self.stalls
    }
}
