//! Enumeration types for the Omega engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Regime
// ---------------------------------------------------------------------------

/// Lower bound (inclusive) of the [`Regime::Coherent`] band.
pub const COHERENT_THRESHOLD: f64 = 0.80;

/// Lower bound (inclusive) of the [`Regime::Stabilizing`] band.
pub const STABILIZING_THRESHOLD: f64 = 0.60;

/// Lower bound (inclusive) of the [`Regime::Drift`] band.
pub const DRIFT_THRESHOLD: f64 = 0.40;

/// Qualitative label derived from a coherence score.
///
/// The bands are half-open on the high side:
///
/// | Regime        | Coherence          |
/// |---------------|--------------------|
/// | `COHERENT`    | `>= 0.80`          |
/// | `STABILIZING` | `[0.60, 0.80)`     |
/// | `DRIFT`       | `[0.40, 0.60)`     |
/// | `CHAOTIC`     | `< 0.40`           |
///
/// There is no hysteresis: a score sitting on a boundary flips the label
/// every time it crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Regime {
    /// Uniform state, low relative dispersion.
    Coherent,
    /// Dispersion is settling.
    Stabilizing,
    /// Dispersion is noticeable and the state is wandering.
    Drift,
    /// High relative dispersion.
    Chaotic,
}

impl Regime {
    /// Classify a coherence score into a regime.
    ///
    /// A `NaN` score fails every comparison and lands in [`Regime::Chaotic`].
    pub const fn classify(coherence: f64) -> Self {
        if coherence >= COHERENT_THRESHOLD {
            Self::Coherent
        } else if coherence >= STABILIZING_THRESHOLD {
            Self::Stabilizing
        } else if coherence >= DRIFT_THRESHOLD {
            Self::Drift
        } else {
            Self::Chaotic
        }
    }

    /// Upper-case label used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coherent => "COHERENT",
            Self::Stabilizing => "STABILIZING",
            Self::Drift => "DRIFT",
            Self::Chaotic => "CHAOTIC",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
