//! Merge point between the engine's held state and an external vector.

use crate::error::ShapeError;

/// Merges the current state with an optional external vector.
///
/// Stateless; both vectors are expected to be length-normalized by the
/// caller before routing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bus;

impl Bus {
    /// Create a new bus.
    pub const fn new() -> Self {
        Self
    }

    /// Merge `state` with `external`.
    ///
    /// Without an external vector this returns a copy of `state`. With one,
    /// it returns the element-wise arithmetic mean.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `external` is present and its length
    /// differs from `state`.
    pub fn route(self, state: &[f64], external: Option<&[f64]>) -> Result<Vec<f64>, ShapeError> {
        let Some(external) = external else {
            return Ok(state.to_vec());
        };
        if external.len() != state.len() {
            return Err(ShapeError {
                expected: state.len(),
                actual: external.len(),
            });
        }
        Ok(state
            .iter()
            .zip(external)
            .map(|(a, b)| (a + b) / 2.0)
            .collect())
    }
}
