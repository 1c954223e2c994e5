//! Convenient re-exports for common Cadence types.
pub use crate::{
    attempt::{Attempt, AttemptBuilder, Termination},
    backoff::{Exponential, Regular, MAX_SLEEP},
    clock::{Clock, WallClock},
    error::StrategyError,
    stop::{stop_signal, StopHandle, StopSignal},
    strategy::{LimitCount, LimitTime, Strategy, Timer},
};
