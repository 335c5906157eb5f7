//! External input sources for the engine's step loop.
//!
//! Each step may merge an externally supplied vector into the held state.
//! The [`InputSource`] trait abstracts where that vector comes from -- a
//! sensor feed, a scripted sequence, seeded noise, or nothing at all.
//!
//! [`NoInput`] reproduces a free-running engine. [`NoiseInput`] perturbs the
//! state with seeded uniform noise and is reproducible for a given seed.

use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::SmallRng;

use crate::config::InputConfig;
use crate::error::CoreError;

/// A source of external vectors, polled once per step.
pub trait InputSource {
    /// Return the external vector for the step that will produce time `t`,
    /// or `None` to let the state evolve on its own.
    ///
    /// The returned vector does not need to be `dim` long; the engine pads
    /// or truncates it.
    fn next_input(&mut self, t: u64, dim: usize) -> Option<Vec<f64>>;
}

/// Never supplies an external vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn next_input(&mut self, _t: u64, _dim: usize) -> Option<Vec<f64>> {
        None
    }
}

/// Uniform noise in `[-amplitude, amplitude]` from a seeded generator.
#[derive(Debug, Clone)]
pub struct NoiseInput {
    /// Half-width of the noise band (non-negative, finite).
    amplitude: f64,
    /// Sampling distribution over the band.
    band: Uniform<f64>,
    /// Deterministic generator.
    rng: SmallRng,
}

impl NoiseInput {
    /// Create a noise source. The sign of `amplitude` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `amplitude` is not finite or
    /// the band `[-amplitude, amplitude]` is too wide to sample.
    pub fn new(amplitude: f64, seed: u64) -> Result<Self, CoreError> {
        let amplitude = amplitude.abs();
        let band = Uniform::new_inclusive(-amplitude, amplitude).map_err(|e| {
            CoreError::InvalidConfig {
                reason: format!("input amplitude {amplitude} cannot be sampled: {e}"),
            }
        })?;
        Ok(Self {
            amplitude,
            band,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Half-width of the noise band.
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

impl InputSource for NoiseInput {
    fn next_input(&mut self, _t: u64, dim: usize) -> Option<Vec<f64>> {
        Some((0..dim).map(|_| self.band.sample(&mut self.rng)).collect())
    }
}

/// Build the input source described by `config`.
///
/// A zero amplitude yields [`NoInput`].
///
/// # Errors
///
/// Returns [`CoreError::InvalidConfig`] for an amplitude [`NoiseInput`]
/// cannot sample.
pub fn from_config(config: &InputConfig) -> Result<Box<dyn InputSource>, CoreError> {
    if config.amplitude == 0.0 {
        return Ok(Box::new(NoInput));
    }
    Ok(Box::new(NoiseInput::new(config.amplitude, config.seed)?))
}
