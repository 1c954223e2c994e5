//! Concrete backoff strategies: [`Regular`] and [`Exponential`].
//!
//! Both keep an absolute schedule anchored at the instant the run started, so a timer that is
//! consulted late returns a shorter (or zero) sleep instead of pushing every later attempt back.
//! Once a slot has been missed, the cadence resumes from the late attempt.
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use cadence::{Regular, Strategy};
//!
//! // Every 250ms for up to one second, but always at least three attempts.
//! let strategy = Regular::new(Duration::from_secs(1), Duration::from_millis(250)).with_min(3);
//! assert_eq!(strategy.min(), 3);
//! ```
//!
//! Overflow behavior: exponential steps saturate at [`MAX_SLEEP`] (1 day).

use crate::error::StrategyError;
use crate::strategy::{Strategy, Timer};
use std::time::{Duration, Instant};

/// Largest single sleep an exponential timer will produce (1 day).
pub const MAX_SLEEP: Duration = Duration::from_secs(24 * 60 * 60);

/// Fixed delay between attempts, bounded by a total time budget.
///
/// An attempt is granted only if it would start strictly before `total` has elapsed since the run
/// began. `min` guarantees at least that many attempts regardless of `total`: while the floor is
/// unmet the budget is ignored entirely.
///
/// `Regular::default()` (zero total, zero delay) makes exactly one attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Regular {
    total: Duration,
    delay: Duration,
    min: usize,
}

impl Regular {
    /// Retry every `delay` until `total` has elapsed.
    pub fn new(total: Duration, delay: Duration) -> Self {
        Self { total, delay, min: 0 }
    }

    /// Make at least `min` attempts, even past the total budget.
    pub fn with_min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn min(&self) -> usize {
        self.min
    }
}

impl Strategy for Regular {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        Box::new(RegularTimer {
            end: now.checked_add(self.total),
            next: now.checked_add(self.delay),
            delay: self.delay,
            min: self.min,
            attempts: 1,
        })
    }
}

#[derive(Debug)]
struct RegularTimer {
    // None: the budget reaches past what `Instant` can represent
    end: Option<Instant>,
    next: Option<Instant>,
    delay: Duration,
    min: usize,
    attempts: usize,
}

impl Timer for RegularTimer {
    fn next_sleep(&mut self, now: Instant) -> Option<Duration> {
        let next = self.next?;
        let sleep = next.saturating_duration_since(now);
        let at = now.max(next);
        let within_budget = self.end.map_or(true, |end| at < end);
        if self.attempts >= self.min && !within_budget {
            return None;
        }
        self.attempts += 1;
        self.next = at.checked_add(self.delay);
        Some(sleep)
    }
}

/// Delay that starts at `initial` and is multiplied by `factor` after every attempt.
///
/// Never stops on its own; wrap it with [`Strategy::limit_time`] or [`Strategy::limit_count`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exponential {
    initial: Duration,
    factor: f64,
}

impl Exponential {
    /// Create an exponential strategy. `factor` must be finite and non-negative.
    pub fn new(initial: Duration, factor: f64) -> Result<Self, StrategyError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(StrategyError::InvalidFactor(factor));
        }
        Ok(Self { initial, factor })
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Strategy for Exponential {
    fn new_timer(&self, now: Instant) -> Box<dyn Timer + Send> {
        Box::new(ExponentialTimer {
            initial: self.initial.min(MAX_SLEEP),
            factor: self.factor,
            step: None,
            next: now,
        })
    }
}

#[derive(Debug)]
struct ExponentialTimer {
    initial: Duration,
    factor: f64,
    step: Option<Duration>,
    next: Instant,
}

impl ExponentialTimer {
    fn grow(&self, step: Duration) -> Duration {
        let nanos = step.as_nanos() as f64 * self.factor;
        if nanos >= MAX_SLEEP.as_nanos() as f64 {
            MAX_SLEEP
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }
}

impl Timer for ExponentialTimer {
    fn next_sleep(&mut self, now: Instant) -> Option<Duration> {
        let step = match self.step {
            None => self.initial,
            Some(previous) => self.grow(previous),
        };
        self.step = Some(step);
        let scheduled = self.next.checked_add(step).unwrap_or(now + step);
        let sleep = scheduled.saturating_duration_since(now);
        self.next = now.max(scheduled);
        Some(sleep)
    }
}
