//! Record structs produced by the engine each step.
//!
//! Every record here is built fresh during a single `step` call and handed
//! to the caller by value. None of them hold references back into the
//! engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Regime;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Statistics computed by the symmetry transform for one step.
///
/// `row_means` and `col_means` describe the grid *before* the update;
/// `max_abs`, `variance` and `coherence` describe the vector *after* it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Metrics {
    /// Normalized inverse-dispersion score in `[0, 1]`.
    pub coherence: f64,
    /// Mean of each grid row (one per domain).
    pub row_means: Vec<f64>,
    /// Mean of each grid column (one per axis).
    pub col_means: Vec<f64>,
    /// Largest absolute value in the updated vector.
    pub max_abs: f64,
    /// Population variance of the updated vector.
    pub variance: f64,
}

// ---------------------------------------------------------------------------
// Event history
// ---------------------------------------------------------------------------

/// One entry in the bounded event history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventRecord {
    /// Time counter value after the step that produced this record (>= 1).
    pub step_index: u64,
    /// Coherence reported for that step.
    pub coherence: f64,
    /// Largest absolute value reported for that step.
    pub max_abs: f64,
    /// Variance reported for that step.
    pub variance: f64,
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Global section of an [`Overlay`], copied verbatim from [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GlobalMetrics {
    /// Coherence for the step.
    pub coherence: f64,
    /// Largest absolute value for the step.
    pub max_abs: f64,
    /// Variance for the step.
    pub variance: f64,
}

impl From<&Metrics> for GlobalMetrics {
    fn from(metrics: &Metrics) -> Self {
        Self {
            coherence: metrics.coherence,
            max_abs: metrics.max_abs,
            variance: metrics.variance,
        }
    }
}

/// Multi-resolution summary of a state vector for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Overlay {
    /// Mean of each row slice; length `n_domains`.
    pub domains: Vec<f64>,
    /// Mean of each column across all rows; length `domain_size`.
    pub axes: Vec<f64>,
    /// Whole-vector metrics.
    pub global: GlobalMetrics,
}

// ---------------------------------------------------------------------------
// Step record
// ---------------------------------------------------------------------------

/// Everything the engine reports for one `step` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepRecord {
    /// Time counter after this step.
    pub t: u64,
    /// Caller-supplied label, echoed back unchanged.
    pub tag: Option<String>,
    /// Snapshot of the engine state after this step.
    pub state: Vec<f64>,
    /// Coherence for this step (same as `metrics.coherence`).
    pub coherence: f64,
    /// Regime derived from `coherence`.
    pub regime: Regime,
    /// Full metrics from the symmetry transform.
    pub metrics: Metrics,
    /// Events appended during this step. Always exactly one.
    pub events: Vec<EventRecord>,
    /// Derived overlay for this step.
    pub overlay: Overlay,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_metrics() -> Metrics {
        Metrics {
            coherence: 0.9,
            row_means: vec![0.5, 0.25],
            col_means: vec![0.375, 0.375],
            max_abs: 1.0,
            variance: 0.1,
        }
    }

    #[test]
    fn global_metrics_copy_the_scalar_fields() {
        let metrics = sample_metrics();
        let global = GlobalMetrics::from(&metrics);
        assert!((global.coherence - 0.9).abs() < f64::EPSILON);
        assert!((global.max_abs - 1.0).abs() < f64::EPSILON);
        assert!((global.variance - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn step_record_json_shape() {
        let metrics = sample_metrics();
        let record = StepRecord {
            t: 1,
            tag: None,
            state: vec![1.0, 0.0, 0.5, 0.0],
            coherence: metrics.coherence,
            regime: Regime::Coherent,
            overlay: Overlay {
                domains: vec![0.5, 0.25],
                axes: vec![0.75, 0.0],
                global: GlobalMetrics::from(&metrics),
            },
            events: vec![EventRecord {
                step_index: 1,
                coherence: metrics.coherence,
                max_abs: metrics.max_abs,
                variance: metrics.variance,
            }],
            metrics,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["t"], 1);
        assert!(value["tag"].is_null());
        assert_eq!(value["regime"], "COHERENT");
        assert_eq!(value["events"].as_array().unwrap().len(), 1);
        assert_eq!(value["events"][0]["step_index"], 1);
        assert!(value["overlay"]["global"]["coherence"].is_number());

        let back: StepRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
