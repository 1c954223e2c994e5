//! Time sources consumed by [`Attempt`](crate::Attempt).
//!
//! A clock answers two questions: what time is it, and "wake me after `d`". Production code uses
//! [`WallClock`]; tests can inject [`ManualClock`] (virtual time moved by hand) or
//! [`SteppingClock`] (every sleep completes at once and moves virtual time forward).

use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Clock abstraction so timing can be faked in tests.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant according to this clock.
    fn now(&self) -> Instant;

    /// Future that resolves once `duration` has elapsed on this clock.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Real time backed by the tokio timer.
///
/// Follows `tokio::time::pause`, so tests running on a paused runtime see virtual time here too.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Virtual clock that only moves when [`ManualClock::advance`] is called.
///
/// Clones share the same timeline. Pending sleeps resolve as soon as the clock is advanced past
/// their deadline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    elapsed: Arc<watch::Sender<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { base: Instant::now(), elapsed: Arc::new(watch::Sender::new(Duration::ZERO)) }
    }

    /// Move virtual time forward, waking every sleeper whose deadline has passed.
    pub fn advance(&self, by: Duration) {
        self.elapsed.send_modify(|elapsed| *elapsed = elapsed.saturating_add(by));
    }

    /// Time elapsed on this clock since it was created.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.borrow()
    }

    /// Number of sleeps currently waiting on this clock.
    pub fn sleepers(&self) -> usize {
        self.elapsed.receiver_count()
    }

    /// Yield until at least `count` sleeps are waiting on this clock.
    pub async fn wait_for_sleepers(&self, count: usize) {
        while self.sleepers() < count {
            tokio::task::yield_now().await;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let deadline = self.elapsed().saturating_add(duration);
        let mut rx = self.elapsed.subscribe();
        Box::pin(async move {
            // Err means every clock handle is gone; nothing can wake us, so stop waiting.
            let _ = rx.wait_for(|elapsed| *elapsed >= deadline).await;
        })
    }
}

/// Virtual clock whose sleeps complete immediately, moving time forward by the slept amount.
///
/// Every sleep is recorded, which makes it handy for asserting on the exact schedule a timer
/// produced without waiting for it.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    base: Instant,
    state: Arc<Mutex<SteppingState>>,
}

#[derive(Debug, Default)]
struct SteppingState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self { base: Instant::now(), state: Arc::new(Mutex::new(SteppingState::default())) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SteppingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Place the clock at `elapsed` past its creation instant.
    pub fn set_elapsed(&self, elapsed: Duration) {
        self.lock().elapsed = elapsed;
    }

    /// Time elapsed on this clock since it was created.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    pub fn clear(&self) {
        self.lock().sleeps.clear();
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let mut state = self.lock();
        state.elapsed = state.elapsed.saturating_add(duration);
        state.sleeps.push(duration);
        Box::pin(async {})
    }
}
