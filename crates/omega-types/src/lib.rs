//! Shared type definitions for the Omega 144D state-evolution engine.
//!
//! This crate holds the records the engine hands back to its callers. They
//! are plain data with fixed, named fields, and they flow downstream to
//! `TypeScript` via `ts-rs` for the overlay front end.
//!
//! # Modules
//!
//! - [`enums`] -- [`Regime`] and its classification thresholds
//! - [`structs`] -- Per-step records: metrics, events, overlay, step record

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{COHERENT_THRESHOLD, DRIFT_THRESHOLD, Regime, STABILIZING_THRESHOLD};
pub use structs::{EventRecord, GlobalMetrics, Metrics, Overlay, StepRecord};
