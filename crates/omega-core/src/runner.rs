//! Bounded step loop.
//!
//! [`run_steps`] drives [`OmegaEngine::step`] a fixed number of times,
//! polling an [`InputSource`] for each step's external vector, tagging step
//! `k` as `{tag_prefix}{k}`, and handing every record to a
//! [`StepObserver`].

use omega_types::{Regime, StepRecord};
use tracing::info;

use crate::engine::OmegaEngine;
use crate::error::CoreError;
use crate::input::InputSource;

/// Callback invoked after each step completes.
///
/// Implementations can use this to print, serialize, or collect records.
pub trait StepObserver {
    /// Called after a step completes successfully.
    fn on_step(&mut self, record: &StepRecord);
}

/// A no-op observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_step(&mut self, _record: &StepRecord) {}
}

/// Collects every record it sees.
#[derive(Debug, Clone, Default)]
pub struct CollectingObserver {
    /// Records in the order they were produced.
    pub records: Vec<StepRecord>,
}

impl StepObserver for CollectingObserver {
    fn on_step(&mut self, record: &StepRecord) {
        self.records.push(record.clone());
    }
}

/// Outcome of a bounded run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of steps executed.
    pub total_steps: u64,
    /// Record of the last step, if any step ran.
    pub final_record: Option<StepRecord>,
    /// Number of steps whose regime differed from the previous step's.
    pub regime_changes: u64,
}

impl RunSummary {
    /// Regime of the last step, if any step ran.
    pub fn final_regime(&self) -> Option<Regime> {
        self.final_record.as_ref().map(|record| record.regime)
    }
}

/// Run `steps` steps on `engine`.
///
/// # Errors
///
/// Stops at and returns the first [`CoreError`] from a step. Steps that
/// completed before the error have already been applied to the engine and
/// reported to the observer.
pub fn run_steps(
    engine: &mut OmegaEngine,
    steps: u64,
    source: &mut dyn InputSource,
    tag_prefix: &str,
    observer: &mut dyn StepObserver,
) -> Result<RunSummary, CoreError> {
    info!(steps, start_t = engine.t(), dim = engine.dim(), "Run starting");

    let mut final_record: Option<StepRecord> = None;
    let mut total_steps: u64 = 0;
    let mut regime_changes: u64 = 0;

    for k in 0..steps {
        let next_t = engine.t().saturating_add(1);
        let input = source.next_input(next_t, engine.dim());
        let tag = format!("{tag_prefix}{k}");
        let record = engine.step(input.as_deref(), Some(&tag))?;

        if final_record
            .as_ref()
            .is_some_and(|previous| previous.regime != record.regime)
        {
            regime_changes = regime_changes.saturating_add(1);
        }
        total_steps = total_steps.saturating_add(1);

        observer.on_step(&record);
        final_record = Some(record);
    }

    info!(
        total_steps,
        regime_changes,
        final_t = engine.t(),
        final_regime = final_record.as_ref().map(|r| r.regime.as_str()),
        "Run finished"
    );

    Ok(RunSummary {
        total_steps,
        final_record,
        regime_changes,
    })
}
