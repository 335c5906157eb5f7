//! End-to-end tests for the `omega-core` engine.
//!
//! These drive [`OmegaEngine`] only through its public surface and check the
//! behavioral guarantees callers rely on: length coercion, determinism,
//! monotonic time, coherence bounds, regime partition, the event bound, and
//! overlay shape.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::arithmetic_side_effects
)]

use omega_core::input::{NoInput, NoiseInput};
use omega_core::runner::CollectingObserver;
use omega_core::{CoreError, EngineConfig, OmegaEngine, SymmetryTransform, run_steps};
use omega_types::Regime;

fn config(n_domains: usize, domain_size: usize, max_events: usize) -> EngineConfig {
    EngineConfig {
        n_domains,
        domain_size,
        max_events,
        ..EngineConfig::default()
    }
}

// =============================================================================
// Reference scenario
// =============================================================================

#[test]
fn default_engine_single_step_scenario() {
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[1.0, 0.0, 1.0, 1.0]).unwrap();

    let record = engine.step(None, None).unwrap();

    assert_eq!(record.t, 1);
    assert_eq!(engine.t(), 1);
    assert_eq!(record.state.len(), 144);
    assert!((0.0..=1.0).contains(&record.coherence));
    assert!(matches!(
        record.regime,
        Regime::Coherent | Regime::Stabilizing | Regime::Drift | Regime::Chaotic
    ));
    assert_eq!(record.overlay.domains.len(), 12);
    assert_eq!(record.overlay.axes.len(), 12);
    assert_eq!(record.events.len(), 1);
    assert_eq!(record.events[0].step_index, 1);
    assert!(record.tag.is_none());
}

#[test]
fn reference_first_step_values() {
    // Row 0 holds [1, 0, 1, 1, 0 ...]; every other row is zero.
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[1.0, 0.0, 1.0, 1.0]).unwrap();
    let record = engine.step(None, None).unwrap();

    let row0_mean = 3.0 / 12.0;
    assert!((record.metrics.row_means[0] - row0_mean).abs() < 1e-12);
    assert!(record.metrics.row_means[1..].iter().all(|m| *m == 0.0));
    assert!((record.metrics.col_means[0] - 1.0 / 12.0).abs() < 1e-12);
    assert!(record.metrics.col_means[1].abs() < 1e-12);

    // cell (0,0): 0.96 * 1 + 0.18 * 0.5 * (3/12 + 1/12)
    let expected = 0.96f64.mul_add(1.0, 0.18 * 0.5 * (row0_mean + 1.0 / 12.0));
    assert!((record.state[0] - expected).abs() < 1e-12);
    assert!((record.metrics.max_abs - expected).abs() < 1e-12);

    // cell (5,5) sees only zero means and stays zero.
    assert!(record.state[5 * 12 + 5].abs() < 1e-12);

    assert_eq!(record.regime, Regime::classify(record.coherence));
}

// =============================================================================
// Length coercion
// =============================================================================

#[test]
fn initialize_pads_short_vectors_with_zeros() {
    let mut engine = OmegaEngine::with_defaults();
    let v = [3.0, -1.0, 2.5];
    engine.initialize(&v).unwrap();

    let state = engine.state();
    assert_eq!(state.len(), 144);
    assert_eq!(&state[..3], &v);
    assert!(state[3..].iter().all(|x| *x == 0.0));
}

#[test]
fn initialize_truncates_long_vectors() {
    let mut engine = OmegaEngine::with_defaults();
    let v: Vec<f64> = (0..200).map(f64::from).collect();
    engine.initialize(&v).unwrap();

    assert_eq!(engine.state().len(), 144);
    assert_eq!(engine.state(), &v[..144]);
}

// =============================================================================
// Determinism and time
// =============================================================================

#[test]
fn identical_engines_produce_identical_records() {
    let mut a = OmegaEngine::with_defaults();
    let mut b = OmegaEngine::with_defaults();
    a.initialize(&[0.3, -0.7, 1.1, 0.0, 2.0]).unwrap();
    b.initialize(&[0.3, -0.7, 1.1, 0.0, 2.0]).unwrap();

    for _ in 0..2 {
        assert_eq!(a.step(None, Some("s")).unwrap(), b.step(None, Some("s")).unwrap());
    }
}

#[test]
fn time_counts_steps_since_initialize() {
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[1.0]).unwrap();
    for n in 1..=25_u64 {
        let record = engine.step(None, None).unwrap();
        assert_eq!(record.t, n);
        assert_eq!(engine.t(), n);
    }
}

// =============================================================================
// Coherence and regime
// =============================================================================

#[test]
fn null_state_is_perfectly_coherent() {
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[]).unwrap();
    let record = engine.step(None, None).unwrap();
    assert_eq!(record.coherence, 1.0);
    assert_eq!(record.regime, Regime::Coherent);
}

#[test]
fn coherence_is_bounded_for_huge_finite_state() {
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[1e200]).unwrap();
    for _ in 0..3 {
        let record = engine.step(None, None).unwrap();
        assert!(
            (0.0..=1.0).contains(&record.coherence),
            "t = {}, coherence = {}",
            record.t,
            record.coherence
        );
        assert!(record.state.iter().all(|x| x.is_finite()));
    }
}

#[test]
fn coherence_is_bounded_for_varied_inputs() {
    let mut source = NoiseInput::new(1e3, 5).unwrap();
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[1e-9, -1e9, 42.0]).unwrap();
    let mut observer = CollectingObserver::default();
    run_steps(&mut engine, 50, &mut source, "c", &mut observer).unwrap();

    for record in &observer.records {
        assert!(
            (0.0..=1.0).contains(&record.coherence),
            "t = {}, coherence = {}",
            record.t,
            record.coherence
        );
        assert_eq!(record.regime, Regime::classify(record.coherence));
    }
}

#[test]
fn regime_thresholds() {
    let cases = [
        (0.80, Regime::Coherent),
        (0.7999, Regime::Stabilizing),
        (0.60, Regime::Stabilizing),
        (0.5999, Regime::Drift),
        (0.40, Regime::Drift),
        (0.3999, Regime::Chaotic),
    ];
    for (coherence, expected) in cases {
        assert_eq!(OmegaEngine::classify_regime(coherence), expected, "{coherence}");
    }
}

// =============================================================================
// Event history bound
// =============================================================================

#[test]
fn history_keeps_the_most_recent_max_events() {
    let max_events = 6;
    let extra = 4_u64;
    let mut engine = OmegaEngine::new(config(3, 3, max_events)).unwrap();
    engine.initialize(&[1.0, 2.0, 3.0]).unwrap();

    let total = u64::try_from(max_events).unwrap() + extra;
    run_steps(&mut engine, total, &mut NoInput, "e", &mut CollectingObserver::default()).unwrap();

    let events = engine.get_events();
    assert_eq!(events.len(), max_events);
    let indices: Vec<u64> = events.iter().map(|e| e.step_index).collect();
    let expected: Vec<u64> = (extra + 1..=total).collect();
    assert_eq!(indices, expected);
}

#[test]
fn default_history_caps_at_five_hundred() {
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[1.0, 0.0, 1.0, 1.0]).unwrap();
    for _ in 0..503 {
        engine.step(None, None).unwrap();
    }
    let events = engine.get_events();
    assert_eq!(events.len(), 500);
    assert_eq!(events.first().map(|e| e.step_index), Some(4));
    assert_eq!(events.last().map(|e| e.step_index), Some(503));
}

// =============================================================================
// Overlay shape
// =============================================================================

#[test]
fn overlay_shape_follows_grid() {
    for (rows, cols) in [(1, 1), (2, 5), (5, 2), (12, 12)] {
        let mut engine = OmegaEngine::new(config(rows, cols, 10)).unwrap();
        engine.initialize(&[1.0, -2.0, 3.0]).unwrap();
        let record = engine.step(Some(&[0.5; 7][..]), None).unwrap();
        assert_eq!(record.overlay.domains.len(), rows);
        assert_eq!(record.overlay.axes.len(), cols);
        assert_eq!(record.state.len(), rows * cols);
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn direct_transform_call_reports_shape_error() {
    let transform = SymmetryTransform::default();
    let err = transform.compute(&[0.0; 143]).unwrap_err();
    assert_eq!(err.expected, 144);
    assert_eq!(err.actual, 143);

    let core: CoreError = err.into();
    assert!(matches!(core, CoreError::Shape { .. }));
}

#[test]
fn step_record_serializes_with_upper_case_regime() {
    let mut engine = OmegaEngine::with_defaults();
    engine.initialize(&[]).unwrap();
    let record = engine.step(None, Some("json")).unwrap();

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["regime"], "COHERENT");
    assert_eq!(value["tag"], "json");
    assert_eq!(value["overlay"]["domains"].as_array().unwrap().len(), 12);
}
