//! One-shot, broadcast cancellation for attempts.
//!
//! [`stop_signal`] returns a [`StopHandle`] (the sending side) and a [`StopSignal`] (the
//! observing side). Raising the handle is permanent: every current and future clone of the
//! signal observes it, and observing never consumes it. Dropping every handle without raising
//! it leaves the signal quiet forever.
//!
//! ```rust
//! use cadence::stop_signal;
//!
//! let (handle, signal) = stop_signal();
//! assert!(!signal.is_stopped());
//! handle.stop();
//! assert!(signal.is_stopped());
//! assert!(signal.clone().is_stopped());
//! ```

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Create a connected stop handle and signal.
pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx: Arc::new(tx) }, StopSignal { rx: Some(rx) })
}

/// Sending side of a stop signal. Clones raise the same signal.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Raise the signal. Idempotent.
    pub fn stop(&self) {
        if !self.tx.send_replace(true) {
            tracing::debug!("stop signal raised");
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Another observer of this handle's signal.
    pub fn signal(&self) -> StopSignal {
        StopSignal { rx: Some(self.tx.subscribe()) }
    }
}

/// Observing side of a stop signal.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    // None: never fires
    rx: Option<watch::Receiver<bool>>,
}

impl StopSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_stopped(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the signal is raised; pending forever if it never is.
    pub fn stopped(&self) -> impl Future<Output = ()> + Send + 'static {
        let rx = self.rx.clone();
        async move {
            match rx {
                Some(mut rx) => {
                    let closed = rx.wait_for(|stopped| *stopped).await.is_err();
                    if closed {
                        // every handle dropped without stopping
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}

impl From<watch::Receiver<bool>> for StopSignal {
    fn from(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stopped_resolves_after_stop() {
        let (handle, signal) = stop_signal();
        let waiter = tokio::spawn(signal.stopped());
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        handle.stop();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke")
            .expect("task ok");
    }

    #[tokio::test]
    async fn stop_is_sticky_and_broadcast() {
        let (handle, signal) = stop_signal();
        handle.stop();
        handle.stop();
        let late = handle.signal();
        for s in [signal.clone(), signal, late] {
            assert!(s.is_stopped());
            tokio::time::timeout(Duration::from_secs(1), s.stopped())
                .await
                .expect("already stopped resolves immediately");
            // observing does not consume
            assert!(s.is_stopped());
        }
        assert!(handle.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn never_signal_stays_pending() {
        let signal = StopSignal::never();
        assert!(!signal.is_stopped());
        let res = tokio::time::timeout(Duration::from_secs(60), signal.stopped()).await;
        assert!(res.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_never_fires() {
        let (handle, signal) = stop_signal();
        drop(handle);
        assert!(!signal.is_stopped());
        let res = tokio::time::timeout(Duration::from_secs(60), signal.stopped()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn from_watch_receiver() {
        let (tx, rx) = watch::channel(false);
        let signal = StopSignal::from(rx);
        tx.send_replace(true);
        assert!(signal.is_stopped());
    }
}
