//! Symmetry transform: one relaxation pass over the state grid.
//!
//! The flat state vector is viewed row-major as an `n_domains x domain_size`
//! grid. Every cell is pulled toward the average of its row mean and its
//! column mean, while a damping term sheds a fraction of its previous value:
//!
//! ```text
//! neighborhood = 0.5 * (row_mean[i] + col_mean[j])
//! updated      = (1 - damping) * x + coupling * neighborhood
//! ```
//!
//! The update is synchronous (all means are taken from the input grid) and
//! runs exactly once per call; there is no iteration to convergence.
//!
//! # Coherence
//!
//! With `m = max |x|` and `v` the population variance of the updated vector:
//!
//! - `m == 0` gives coherence `1.0` (the null state is perfectly coherent);
//! - otherwise `coherence = 1 / (1 + v / (m^2 + 1e-9))`, clamped to `[0, 1]`.
//!
//! Low dispersion relative to magnitude maps to values near 1. The score is
//! evaluated on `x / m`, so it stays in `[0, 1]` even when `v` itself
//! overflows to infinity for very large finite inputs.

use omega_types::Metrics;

use crate::config::EngineConfig;
use crate::error::ShapeError;

/// Guard added to `max_abs^2` in the coherence denominator.
pub const COHERENCE_EPSILON: f64 = 1e-9;

/// The row/column coupling update with damping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryTransform {
    /// Number of grid rows.
    n_domains: usize,
    /// Number of grid columns.
    domain_size: usize,
    /// Weight given to the neighborhood average.
    coupling: f64,
    /// Fraction of the previous value shed per pass.
    damping: f64,
    /// `n_domains * domain_size`.
    dim: usize,
}

impl SymmetryTransform {
    /// Create a transform for an `n_domains x domain_size` grid.
    ///
    /// Returns `None` if the grid size overflows `usize`.
    pub const fn new(
        n_domains: usize,
        domain_size: usize,
        coupling: f64,
        damping: f64,
    ) -> Option<Self> {
        match n_domains.checked_mul(domain_size) {
            Some(dim) => Some(Self {
                n_domains,
                domain_size,
                coupling,
                damping,
                dim,
            }),
            None => None,
        }
    }

    /// Create a transform from engine configuration.
    pub const fn from_config(config: &EngineConfig) -> Option<Self> {
        Self::new(
            config.n_domains,
            config.domain_size,
            config.coupling,
            config.damping,
        )
    }

    /// Required vector length.
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Number of grid rows.
    pub const fn n_domains(&self) -> usize {
        self.n_domains
    }

    /// Number of grid columns.
    pub const fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Apply one relaxation pass and measure the result.
    ///
    /// The input is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `vector.len() != dim`.
    pub fn compute(&self, vector: &[f64]) -> Result<(Vec<f64>, Metrics), ShapeError> {
        if vector.len() != self.dim {
            return Err(ShapeError {
                expected: self.dim,
                actual: vector.len(),
            });
        }

        // Degenerate grid with empty rows.
        if self.domain_size == 0 {
            let metrics = Metrics {
                coherence: 1.0,
                row_means: vec![0.0; self.n_domains],
                col_means: Vec::new(),
                max_abs: 0.0,
                variance: 0.0,
            };
            return Ok((Vec::new(), metrics));
        }

        let row_means = row_means(vector, self.domain_size);
        let col_means = col_means(vector, self.n_domains, self.domain_size);

        let retain = 1.0 - self.damping;
        let mut updated = Vec::with_capacity(self.dim);
        for (row, row_mean) in vector.chunks_exact(self.domain_size).zip(&row_means) {
            for (x, col_mean) in row.iter().zip(&col_means) {
                let neighborhood = 0.5 * (row_mean + col_mean);
                updated.push(retain.mul_add(*x, self.coupling * neighborhood));
            }
        }

        let max_abs = max_abs(&updated);
        let variance = population_variance(&updated);
        let metrics = Metrics {
            coherence: coherence(&updated, max_abs),
            row_means,
            col_means,
            max_abs,
            variance,
        };

        Ok((updated, metrics))
    }
}

impl Default for SymmetryTransform {
    fn default() -> Self {
        Self {
            n_domains: 12,
            domain_size: 12,
            coupling: 0.18,
            damping: 0.04,
            dim: 144,
        }
    }
}

/// Coherence score of `values`, whose largest magnitude is `max_abs`.
///
/// Equal to `1 / (1 + variance / (max_abs^2 + 1e-9))`, evaluated on
/// `values / max_abs` so that no intermediate overflows for large finite
/// inputs. Non-finite values score `0.0`.
pub fn coherence(values: &[f64], max_abs: f64) -> f64 {
    if max_abs == 0.0 {
        return 1.0;
    }
    let scaled_variance = scaled_variance(values, max_abs);
    // An overflowing max_abs^2 only drops the epsilon term.
    let guard = 1.0 + COHERENCE_EPSILON / (max_abs * max_abs);
    let norm_var = scaled_variance / guard;
    if !norm_var.is_finite() {
        return 0.0;
    }
    (1.0 / (1.0 + norm_var)).clamp(0.0, 1.0)
}

/// Population variance of `values / scale`.
fn scaled_variance(values: &[f64], scale: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mu = values.iter().map(|x| x / scale).sum::<f64>() / n;
    values
        .iter()
        .map(|x| {
            let d = x / scale - mu;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Arithmetic mean; `0.0` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}

/// Mean of squared deviations from the mean; `0.0` for an empty slice.
pub(crate) fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / n
}

/// Largest absolute value; `0.0` for an empty slice.
pub(crate) fn max_abs(values: &[f64]) -> f64 {
    values.iter().map(|x| x.abs()).fold(0.0, f64::max)
}

/// Mean of each row-major slice of length `domain_size`.
pub(crate) fn row_means(vector: &[f64], domain_size: usize) -> Vec<f64> {
    if domain_size == 0 {
        return Vec::new();
    }
    vector.chunks(domain_size).map(mean).collect()
}

/// Mean of each column across the first `n_domains` rows.
pub(crate) fn col_means(vector: &[f64], n_domains: usize, domain_size: usize) -> Vec<f64> {
    let mut sums = vec![0.0; domain_size];
    if domain_size == 0 {
        return sums;
    }
    for row in vector.chunks_exact(domain_size).take(n_domains) {
        for (sum, x) in sums.iter_mut().zip(row) {
            *sum += x;
        }
    }
    if n_domains == 0 {
        return sums;
    }
    #[allow(clippy::cast_precision_loss)]
    let rows = n_domains as f64;
    for sum in &mut sums {
        *sum /= rows;
    }
    sums
}
