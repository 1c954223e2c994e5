//! Strategy and timer traits, plus the limiting wrappers.
//!
//! A [`Strategy`] is an immutable description of a retry schedule. Each run of the schedule gets
//! its own [`Timer`], created from the instant the run starts, so one strategy value can drive
//! any number of independent attempts.
//!
//! Timer semantics:
//! - `next_sleep` is called once per loop position that is about to wait, never before the first
//!   attempt (which is always granted).
//! - Late calls get a shorter (possibly zero) sleep; they never receive a negative correction.
//! - `None` means stop, and the owning attempt never asks again.
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use cadence::{Exponential, Strategy};
//!
//! // Exponential backoff starting at 10ms, growing by 1.5x, for at most 30s and 10 attempts.
//! let strategy = Exponential::new(Duration::from_millis(10), 1.5)
//!     .unwrap()
//!     .limit_time(Duration::from_secs(30))
//!     .limit_count(10);
//! # let _ = strategy;
//! ```

use crate::attempt::{Attempt, AttemptBuilder};
use std::fmt;
use std::time::{Duration, Instant};

/// Stateful cursor over one run of a strategy.
pub trait Timer: fmt::Debug {
    /// Sleep to apply before the next attempt, or `None` if no more attempts should be made.
    fn next_sleep(&mut self, now: Instant) -> Option<Duration>;
}

/// Retry schedule that produces a fresh [`Timer`] for each run.
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Create the timer for a run starting at `now`.
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send>;

    /// Start an attempt on the wall clock with no stop signal.
    fn start(&self) -> Attempt
    where
        Self: Sized,
    {
        Attempt::start(self)
    }

    /// Configure an attempt (clock, stop signal) before starting it.
    fn attempt(&self) -> AttemptBuilder<'_>
    where
        Self: Sized,
    {
        Attempt::builder(self)
    }

    /// Stop once the total elapsed time would exceed `budget`.
    fn limit_time(self, budget: Duration) -> LimitTime<Self>
    where
        Self: Sized,
    {
        LimitTime::new(budget, self)
    }

    /// Stop after `max_attempts` attempts.
    fn limit_count(self, max_attempts: usize) -> LimitCount<Self>
    where
        Self: Sized,
    {
        LimitCount::new(max_attempts, self)
    }
}

impl<S: Strategy + ?Sized> Strategy for &S {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        (**self).new_timer(now)
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        (**self).new_timer(now)
    }
}

impl<S: Strategy + ?Sized> Strategy for std::sync::Arc<S> {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        (**self).new_timer(now)
    }
}

/// Caps the total time spent by an inner strategy.
///
/// The run continues only while the time elapsed since the start plus the proposed sleep stays
/// within `budget`, and the inner strategy wants to continue. The first attempt is always made.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitTime<S> {
    budget: Duration,
    inner: S,
}

impl<S> LimitTime<S> {
    pub fn new(budget: Duration, inner: S) -> Self {
        Self { budget, inner }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Strategy> Strategy for LimitTime<S> {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        Box::new(LimitTimeTimer {
            start: now,
            budget: self.budget,
            inner: self.inner.new_timer(now),
        })
    }
}

#[derive(Debug)]
struct LimitTimeTimer {
    start: Instant,
    budget: Duration,
    inner: Box<dyn Timer + Send>,
}

impl Timer for LimitTimeTimer {
    fn next_sleep(&mut self, now: Instant) -> Option<Duration> {
        let sleep = self.inner.next_sleep(now)?;
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed.saturating_add(sleep) > self.budget {
            return None;
        }
        Some(sleep)
    }
}

/// Caps the number of attempts made by an inner strategy.
///
/// Counts include the initial attempt, so `LimitCount::new(1, s)` never retries. A limit of zero
/// behaves like one: the first attempt is always made.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitCount<S> {
    max_attempts: usize,
    inner: S,
}

impl<S> LimitCount<S> {
    pub fn new(max_attempts: usize, inner: S) -> Self {
        Self { max_attempts, inner }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Strategy> Strategy for LimitCount<S> {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        Box::new(LimitCountTimer {
            attempts: 1,
            max_attempts: self.max_attempts,
            inner: self.inner.new_timer(now),
        })
    }
}

#[derive(Debug)]
struct LimitCountTimer {
    // attempts made so far, including the one that just finished
    attempts: usize,
    max_attempts: usize,
    inner: Box<dyn Timer + Send>,
}

impl Timer for LimitCountTimer {
    fn next_sleep(&mut self, now: Instant) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }
        let sleep = self.inner.next_sleep(now)?;
        self.attempts += 1;
        Some(sleep)
    }
}
