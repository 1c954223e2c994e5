//! Error types for strategy construction.
//!
//! Running an [`Attempt`](crate::Attempt) never fails: exhaustion and cancellation both end the
//! loop by returning `false`. The only errors in this crate come from validating strategy inputs.

/// Errors returned when building a strategy from invalid parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum StrategyError {
    /// Exponential growth factor was NaN, infinite, or negative.
    #[error("exponential factor must be finite and >= 0 (got {0})")]
    InvalidFactor(f64),
}
