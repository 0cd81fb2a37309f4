//! Crate-wide error kinds.
//!
//! Hot-path operations never raise an exception-like error: they return a
//! discrete result (`Option`, `bool`, or a `(filled, notional)` pair) as
//! required by spec. The error kinds below cover the edges where a result
//! type is not descriptive enough: decimal division by zero, and the
//! configuration mistakes that are reported before the engine starts
//! processing anything.

use thiserror::Error;

/// Error raised by [`crate::decimal::Decimal`] arithmetic.
///
/// Upstream callers are expected never to produce this on a well-formed
/// feed; it exists so a malformed configuration (zero tick size, zero
/// divisor) fails loudly instead of panicking on the hot path.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Division where the divisor's raw value is zero.
    #[error("division by zero in decimal arithmetic")]
    DivisionByZero,
}

/// Errors reported before any hot-path processing begins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// A caller tried to `subscribe` to a bus that has already `start()`-ed.
    #[error("cannot subscribe: bus has already started")]
    AlreadyStarted,

    /// A caller tried to `start()` a bus with zero subscribers.
    #[error("cannot start: bus has no subscribers")]
    NoSubscribers,

    /// The order tracker's fixed-capacity table has no free slot left.
    ///
    /// Spec treats this as fatal for the process; this library instead
    /// returns it so the embedding application decides how to fail.
    #[error("order tracker capacity exhausted (size = {size})")]
    Overflow {
        /// The tracker's configured capacity.
        size: usize,
    },
}
