//! The attempt loop driver.
//!
//! An [`Attempt`] gates a retry loop that the caller writes. It never runs the action itself; it
//! only decides when the next iteration may begin:
//!
//! ```rust
//! use std::time::Duration;
//! use cadence::{Attempt, Regular};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let strategy = Regular::new(Duration::from_millis(50), Duration::from_millis(10));
//! let mut attempt = Attempt::start(&strategy);
//! while attempt.next().await {
//!     if try_something() {
//!         break;
//!     }
//! }
//! assert!(attempt.count() >= 1);
//! # });
//! # fn try_something() -> bool { false }
//! ```
//!
//! Semantics:
//! - The first call to [`Attempt::next`] always returns `true`; the timer is only consulted
//!   before the second and later attempts.
//! - [`Attempt::has_next`] performs the wait for the upcoming attempt (if not already done) and
//!   reports what `next` will return. Calling it repeatedly waits at most once.
//! - Waiting races the clock against the stop signal; whichever fires first wins. A stop ends
//!   the run exactly like an exhausted strategy does.
//!
//! Invariants:
//! - `count()` equals the number of times `next` returned `true`.
//! - The timer is advanced at most once per loop position.
//! - Once `next` or `has_next` returns `false`, both keep returning `false`.

use crate::clock::{Clock, WallClock};
use crate::stop::StopSignal;
use crate::strategy::{Strategy, Timer};
use std::sync::Arc;

/// Why an attempt run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The strategy ran out of attempts.
    Exhausted,
    /// The stop signal fired while waiting.
    Stopped,
}

/// A running sequence of attempts for one strategy.
pub struct Attempt {
    clock: Arc<dyn Clock>,
    stop: StopSignal,
    timer: Box<dyn Timer + Send>,
    count: usize,
    waited: bool,
    termination: Option<Termination>,
}

impl std::fmt::Debug for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attempt")
            .field("clock", &self.clock)
            .field("timer", &self.timer)
            .field("count", &self.count)
            .field("waited", &self.waited)
            .field("termination", &self.termination)
            .finish()
    }
}

impl Attempt {
    /// Start attempts for `strategy` on the wall clock with no stop signal.
    pub fn start<S: Strategy + ?Sized>(strategy: &S) -> Self {
        Self::new(strategy, Arc::new(WallClock), StopSignal::never())
    }

    /// Configure the clock and stop signal before starting.
    pub fn builder<S: Strategy>(strategy: &S) -> AttemptBuilder<'_> {
        AttemptBuilder::new(strategy)
    }

    fn new<S: Strategy + ?Sized>(strategy: &S, clock: Arc<dyn Clock>, stop: StopSignal) -> Self {
        let timer = strategy.new_timer(clock.now());
        Self { clock, stop, timer, count: 0, waited: true, termination: None }
    }

    /// Wait until the next attempt is due and return `true`, or return `false` when no more
    /// attempts should be made. The first call always returns `true` without waiting.
    pub async fn next(&mut self) -> bool {
        self.has_next().await;
        self.waited = false;
        if self.termination.is_some() {
            return false;
        }
        self.count += 1;
        tracing::debug!(attempt = self.count, "attempt granted");
        true
    }

    /// Wait until the next attempt is due and report whether [`Attempt::next`] will grant it.
    ///
    /// Consecutive calls without an intervening `next` do not wait again.
    pub async fn has_next(&mut self) -> bool {
        if self.waited || self.termination.is_some() {
            return self.is_running();
        }
        self.waited = true;

        let Some(sleep) = self.timer.next_sleep(self.clock.now()) else {
            self.terminate(Termination::Exhausted);
            return false;
        };

        tracing::debug!(attempt = self.count + 1, ?sleep, "waiting for next attempt");
        let delay = self.clock.sleep(sleep);
        let stopped = self.stop.stopped();
        tokio::select! {
            biased;
            _ = stopped => self.terminate(Termination::Stopped),
            _ = delay => {}
        }
        self.is_running()
    }

    /// Number of attempts granted so far; 0 before the first call to `next`.
    pub fn count(&self) -> usize {
        self.count
    }

    /// `false` once the run has ended. Never waits.
    pub fn is_running(&self) -> bool {
        self.termination.is_none()
    }

    /// Why the run ended, if it has.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// `true` if the run ended because the stop signal fired.
    pub fn stopped(&self) -> bool {
        self.termination == Some(Termination::Stopped)
    }

    fn terminate(&mut self, reason: Termination) {
        tracing::debug!(attempts = self.count, ?reason, "attempts finished");
        self.termination = Some(reason);
    }
}

/// Builder for [`Attempt`]; defaults to [`WallClock`] and a stop signal that never fires.
pub struct AttemptBuilder<'a> {
    strategy: &'a dyn Strategy,
    clock: Arc<dyn Clock>,
    stop: StopSignal,
}

impl<'a> AttemptBuilder<'a> {
    pub fn new<S: Strategy>(strategy: &'a S) -> Self {
        Self { strategy, clock: Arc::new(WallClock), stop: StopSignal::never() }
    }

    /// Use a custom clock (useful for deterministic tests).
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a clock shared with other attempts.
    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Abort waiting as soon as `stop` fires.
    pub fn with_stop(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Create the timer from the clock's current instant and begin the run.
    pub fn start(self) -> Attempt {
        Attempt::new(self.strategy, self.clock, self.stop)
    }
}

impl std::fmt::Debug for AttemptBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptBuilder")
            .field("strategy", &self.strategy)
            .field("clock", &self.clock)
            .field("stop", &self.stop)
            .finish()
    }
}
