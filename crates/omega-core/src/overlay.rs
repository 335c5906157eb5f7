//! Overlay builder: per-domain, per-axis, and global summaries of a state.
//!
//! Purely derived data for display. Nothing here is stored between steps
//! and nothing depends on the event history.

use omega_types::{GlobalMetrics, Metrics, Overlay};

use crate::config::EngineConfig;
use crate::symmetry::mean;

/// Builds an [`Overlay`] from a state vector and its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBuilder {
    /// Number of grid rows.
    n_domains: usize,
    /// Number of grid columns.
    domain_size: usize,
}

impl OverlayBuilder {
    /// Create a builder for an `n_domains x domain_size` grid.
    pub const fn new(n_domains: usize, domain_size: usize) -> Self {
        Self {
            n_domains,
            domain_size,
        }
    }

    /// Create a builder from engine configuration.
    pub const fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.n_domains, config.domain_size)
    }

    /// Summarize `state`.
    ///
    /// `domains` always has `n_domains` entries and `axes` always has
    /// `domain_size` entries. A row slice that falls outside `state` counts
    /// as empty and contributes `0.0`.
    pub fn expand(&self, state: &[f64], metrics: &Metrics) -> Overlay {
        Overlay {
            domains: self.domain_means(state),
            axes: self.axis_means(state),
            global: GlobalMetrics::from(metrics),
        }
    }

    fn domain_means(&self, state: &[f64]) -> Vec<f64> {
        (0..self.n_domains)
            .map(|row| {
                let start = row.saturating_mul(self.domain_size);
                let end = start.saturating_add(self.domain_size).min(state.len());
                state.get(start..end).map_or(0.0, mean)
            })
            .collect()
    }

    fn axis_means(&self, state: &[f64]) -> Vec<f64> {
        (0..self.domain_size)
            .map(|col| {
                let column: Vec<f64> = (0..self.n_domains)
                    .map(|row| {
                        row.checked_mul(self.domain_size)
                            .and_then(|base| base.checked_add(col))
                            .and_then(|idx| state.get(idx))
                            .copied()
                            .unwrap_or(0.0)
                    })
                    .collect();
                mean(&column)
            })
            .collect()
    }
}

impl Default for OverlayBuilder {
    fn default() -> Self {
        Self::new(12, 12)
    }
}
