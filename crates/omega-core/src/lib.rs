//! Discrete-time state-evolution engine for Omega 144D.
//!
//! The engine holds a fixed-length numeric vector, applies one
//! local-averaging pass per step, scores how coherent the result is,
//! classifies it into a regime, and reports a structured record of the
//! step together with a multi-resolution overlay.
//!
//! Each step flows through the same pipeline:
//!
//! ```text
//! external? --> Bus --> SymmetryTransform --> EventHistory --> OverlayBuilder
//!                ^                                                  |
//!                +------------------ OmegaEngine <------------------+
//! ```
//!
//! # Modules
//!
//! - [`bus`] -- Merges held state with an optional external vector.
//! - [`symmetry`] -- Row/column coupling update and coherence metric.
//! - [`history`] -- Bounded FIFO of per-step event records.
//! - [`overlay`] -- Per-domain, per-axis, and global summaries.
//! - [`engine`] -- [`OmegaEngine`] facade, lifecycle, and regime
//!   classification.
//! - [`input`] -- [`InputSource`] trait, [`NoInput`] and [`NoiseInput`].
//! - [`runner`] -- Bounded step loop with a [`StepObserver`] callback.
//! - [`config`] -- Configuration loading from `omega-config.yaml`.
//! - [`error`] -- [`ShapeError`] and [`CoreError`].
//!
//! [`InputSource`]: input::InputSource
//! [`NoInput`]: input::NoInput
//! [`NoiseInput`]: input::NoiseInput
//! [`StepObserver`]: runner::StepObserver

pub mod bus;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod overlay;
pub mod runner;
pub mod symmetry;

// Re-export primary types at crate root.
pub use bus::Bus;
pub use config::{ConfigError, EngineConfig, OmegaConfig};
pub use engine::{EnginePhase, OmegaEngine, coerce};
pub use error::{CoreError, ShapeError};
pub use history::EventHistory;
pub use overlay::OverlayBuilder;
pub use runner::{RunSummary, StepObserver, run_steps};
pub use symmetry::SymmetryTransform;
