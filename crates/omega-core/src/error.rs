//! Error types for the `omega-core` crate.
//!
//! Shape mismatches are fatal to the call that caused them and are never
//! retried: every operation in this crate is pure and deterministic, so the
//! same input fails the same way.

/// A vector did not have the length the grid requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} elements, got {actual}")]
pub struct ShapeError {
    /// Required length (`n_domains * domain_size`).
    pub expected: usize,
    /// Length that was supplied.
    pub actual: usize,
}

/// Errors that can occur in engine operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A vector passed to the transform or bus had the wrong length.
    #[error("shape error: {source}")]
    Shape {
        /// The underlying shape error.
        #[from]
        source: ShapeError,
    },

    /// An input vector contained `NaN` or an infinity.
    #[error("non-finite value {value} at index {index}")]
    NonFinite {
        /// Position of the first offending element.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A step produced a value outside the finite `f64` range.
    #[error("state overflow: value {value} at index {index}")]
    StateOverflow {
        /// Position of the first offending element.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Engine or input configuration is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The time counter would overflow.
    #[error("time counter overflow: cannot advance beyond u64::MAX")]
    TimeOverflow,
}
