#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Cadence
//!
//! Loop-driven retry attempts for async Rust. Cadence decides *when* the next attempt of your
//! action should happen and whether it should happen at all; it never runs the action for you.
//!
//! ## Features
//!
//! - **Attempt loops** with `next` / `has_next` / `count`, first attempt always granted
//! - **Strategies**: regular delay with a time budget and minimum attempt floor, exponential
//!   growth, and time/count limiting wrappers
//! - **Drift-free schedules**: late iterations shorten the next wait instead of shifting the
//!   whole schedule
//! - **Cancellation** via a sticky, broadcast stop signal that interrupts in-progress waits
//! - **Injectable clocks** for deterministic tests (`ManualClock`, `SteppingClock`)
//!
//! ## Quick Start
//!
//! ```rust
//! use cadence::{Exponential, Strategy};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let strategy = Exponential::new(Duration::from_millis(10), 2.0)
//!         .unwrap()
//!         .limit_count(3);
//!
//!     let mut attempt = strategy.start();
//!     while attempt.next().await {
//!         match do_work() {
//!             Ok(()) => break,
//!             Err(e) if attempt.has_next().await => {
//!                 eprintln!("attempt {} failed: {e}; retrying", attempt.count());
//!             }
//!             Err(e) => {
//!                 eprintln!("giving up after {} attempts: {e}", attempt.count());
//!             }
//!         }
//!     }
//! }
//! # fn do_work() -> Result<(), std::io::Error> { Ok(()) }
//! ```

pub mod attempt;
pub mod backoff;
pub mod clock;
pub mod error;
pub mod prelude;
pub mod stop;
pub mod strategy;

// Re-exports
pub use attempt::{Attempt, AttemptBuilder, Termination};
pub use backoff::{Exponential, Regular, MAX_SLEEP};
pub use clock::{Clock, ManualClock, SteppingClock, WallClock};
pub use error::StrategyError;
pub use stop::{stop_signal, StopHandle, StopSignal};
pub use strategy::{LimitCount, LimitTime, Strategy, Timer};
