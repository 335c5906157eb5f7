//! Engine facade: owns the state vector and the time counter, and wires
//! Bus -> Symmetry Transform -> Event History -> Overlay Builder into a
//! single [`OmegaEngine::step`] call.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Ready --step--> Ready --step--> ...
//!                                 ^                |
//!                                 +--initialize----+
//! ```
//!
//! There is no terminal phase. `initialize` may be called at any time to
//! hard-reset the state and the time counter.
//!
//! # Length coercion
//!
//! Every vector entering the engine (initial or external) is coerced to
//! exactly `dim` elements: short vectors are zero-padded at the end, long
//! vectors are truncated from the end. Element order is preserved.
//!
//! # Non-finite input
//!
//! `initialize` and `step` reject any vector containing `NaN` or an
//! infinity with [`CoreError::NonFinite`]. Rejection happens before any
//! state changes, so a failed call leaves the engine exactly as it was.
//! A step whose result would overflow to infinity (values near `f64::MAX`)
//! is likewise refused with [`CoreError::StateOverflow`].
//!
//! # Concurrency
//!
//! An engine is driven by one caller at a time. `step` takes `&mut self`;
//! sharing an engine across threads requires the caller to wrap it in a
//! lock.

use omega_types::{EventRecord, Regime, StepRecord};
use tracing::{debug, info, warn};

use crate::bus::Bus;
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::history::EventHistory;
use crate::input::InputSource;
use crate::overlay::OverlayBuilder;
use crate::runner::{CollectingObserver, run_steps};
use crate::symmetry::SymmetryTransform;

/// Lifecycle phase of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Constructed, holding the zero state, not yet initialized.
    Uninitialized,
    /// Initialized at least once.
    Ready,
}

/// Discrete-time state-evolution engine.
#[derive(Debug, Clone)]
pub struct OmegaEngine {
    /// Construction parameters.
    config: EngineConfig,
    /// State vector length.
    dim: usize,
    /// State/external merge.
    bus: Bus,
    /// Relaxation kernel.
    transform: SymmetryTransform,
    /// Bounded event log.
    history: EventHistory,
    /// Overlay summaries.
    overlay: OverlayBuilder,
    /// Current state; always exactly `dim` long.
    state: Vec<f64>,
    /// Steps taken since the last `initialize`.
    t: u64,
    /// Lifecycle phase.
    phase: EnginePhase,
    /// Regime reported by the previous step.
    last_regime: Option<Regime>,
    /// Whether stepping an uninitialized engine has already been logged.
    warned_uninitialized: bool,
}

impl OmegaEngine {
    /// Create an engine holding `dim` zeros at `t == 0`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transform =
            SymmetryTransform::from_config(&config).ok_or_else(|| CoreError::InvalidConfig {
                reason: "n_domains * domain_size overflows usize".to_owned(),
            })?;
        let dim = transform.dim();

        debug!(
            n_domains = config.n_domains,
            domain_size = config.domain_size,
            coupling = config.coupling,
            damping = config.damping,
            max_events = config.max_events,
            dim,
            "Engine constructed"
        );

        Ok(Self {
            dim,
            bus: Bus::new(),
            transform,
            history: EventHistory::new(config.max_events),
            overlay: OverlayBuilder::from_config(&config),
            state: vec![0.0; dim],
            t: 0,
            phase: EnginePhase::Uninitialized,
            last_regime: None,
            warned_uninitialized: false,
            config,
        })
    }

    /// Create an engine with the reference parameters (12 x 12 grid,
    /// coupling 0.18, damping 0.04, 500 events).
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        let transform = SymmetryTransform::default();
        let dim = transform.dim();
        Self {
            dim,
            bus: Bus::new(),
            transform,
            history: EventHistory::new(config.max_events),
            overlay: OverlayBuilder::from_config(&config),
            state: vec![0.0; dim],
            t: 0,
            phase: EnginePhase::Uninitialized,
            last_regime: None,
            warned_uninitialized: false,
            config,
        }
    }

    /// Load `initial` as the current state and reset the time counter.
    ///
    /// The event history is kept; only the state and `t` are reset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonFinite`] if `initial` contains `NaN` or an
    /// infinity. The engine is unchanged in that case.
    pub fn initialize(&mut self, initial: &[f64]) -> Result<(), CoreError> {
        check_finite(initial)?;
        self.state = coerce(initial, self.dim);
        self.t = 0;
        self.phase = EnginePhase::Ready;
        self.last_regime = None;
        info!(
            supplied = initial.len(),
            dim = self.dim,
            "Engine initialized"
        );
        Ok(())
    }

    /// Advance the engine by one step.
    ///
    /// `input`, if given, is coerced to `dim` and averaged into the held
    /// state before the transform runs. `tag` is echoed into the record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonFinite`] for a non-finite input,
    /// [`CoreError::StateOverflow`] if the merged or updated state leaves the
    /// finite `f64` range, and [`CoreError::TimeOverflow`] if `t` is already
    /// `u64::MAX`. On error the engine is unchanged.
    pub fn step(&mut self, input: Option<&[f64]>, tag: Option<&str>) -> Result<StepRecord, CoreError> {
        if self.phase == EnginePhase::Uninitialized && !self.warned_uninitialized {
            warn!("Stepping an engine that was never initialized; starting from the zero state");
            self.warned_uninitialized = true;
        }

        let external = match input {
            Some(values) => {
                check_finite(values)?;
                Some(coerce(values, self.dim))
            }
            None => None,
        };
        let t = self.t.checked_add(1).ok_or(CoreError::TimeOverflow)?;

        let merged = self.bus.route(&self.state, external.as_deref())?;
        let (new_state, metrics) = self.transform.compute(&merged)?;
        if let Some((index, value)) = first_non_finite(&new_state) {
            warn!(t, index, value, "Step overflowed the f64 range; state kept");
            return Err(CoreError::StateOverflow { index, value });
        }

        self.t = t;
        let (event_state, events) = self.history.tick(t, new_state, &metrics);
        let overlay = self.overlay.expand(&event_state, &metrics);
        self.state = event_state;

        let coherence = metrics.coherence;
        let regime = Self::classify_regime(coherence);
        if let Some(previous) = self.last_regime.filter(|previous| *previous != regime) {
            info!(t, from = %previous, to = %regime, coherence, "Regime transition");
        }
        self.last_regime = Some(regime);

        debug!(
            t,
            tag,
            coherence,
            regime = %regime,
            max_abs = metrics.max_abs,
            variance = metrics.variance,
            external = external.is_some(),
            "Step complete"
        );

        Ok(StepRecord {
            t,
            tag: tag.map(str::to_owned),
            state: self.state.clone(),
            coherence,
            regime,
            metrics,
            events,
            overlay,
        })
    }

    /// Run `steps` steps fed by `source`, tagging step `k` as
    /// `{tag_prefix}{k}`, and return every record.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError`] from a step; earlier steps stay
    /// applied.
    pub fn run(
        &mut self,
        steps: u64,
        source: &mut dyn InputSource,
        tag_prefix: &str,
    ) -> Result<Vec<StepRecord>, CoreError> {
        let mut observer = CollectingObserver::default();
        run_steps(self, steps, source, tag_prefix, &mut observer)?;
        Ok(observer.records)
    }

    /// Map a coherence score to its regime.
    pub const fn classify_regime(coherence: f64) -> Regime {
        Regime::classify(coherence)
    }

    /// Copy of the event history, oldest first.
    pub fn get_events(&self) -> Vec<EventRecord> {
        self.history.get_events()
    }

    /// Alias for [`get_events`](Self::get_events).
    pub fn events(&self) -> Vec<EventRecord> {
        self.get_events()
    }

    /// Read-only view of the event history.
    pub const fn history(&self) -> &EventHistory {
        &self.history
    }

    /// Current state vector.
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Steps taken since the last `initialize`.
    pub const fn t(&self) -> u64 {
        self.t
    }

    /// State vector length.
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Construction parameters.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lifecycle phase.
    pub const fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Whether `initialize` has been called.
    pub const fn is_initialized(&self) -> bool {
        matches!(self.phase, EnginePhase::Ready)
    }
}

impl Default for OmegaEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Coerce `values` to exactly `dim` elements.
///
/// Zero-pads at the end when short, truncates from the end when long.
pub fn coerce(values: &[f64], dim: usize) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().take(dim).collect();
    out.resize(dim, 0.0);
    out
}

/// Reject the first non-finite element.
fn check_finite(values: &[f64]) -> Result<(), CoreError> {
    match first_non_finite(values) {
        Some((index, value)) => Err(CoreError::NonFinite { index, value }),
        None => Ok(()),
    }
}

fn first_non_finite(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|(_, x)| !x.is_finite())
}
