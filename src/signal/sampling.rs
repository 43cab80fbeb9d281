//! Sampling engine — discretizes the continuous model at a player-chosen
//! rate, optionally perturbed by Gaussian noise.
//!
//! The noiseless path is fully deterministic: identical params and config
//! produce a bit-identical sequence. Noise is the only non-deterministic
//! part and is isolated behind an injectable rng.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::ScopeError;
use crate::signal::model::{self, SignalParams};

/// Oversampling rate of the reference pass, in Hz. 1000 points per second
/// of window approximates the continuous curve for the "true signal"
/// overlay regardless of the player-chosen rate.
pub const REFERENCE_RESOLUTION_HZ: f64 = 1000.0;

/// How the discrete view is taken: rate, window, and noise level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sampling rate `fs` in Hz, must be positive.
    pub rate: f64,
    /// Window duration `D` in seconds, must be positive.
    pub window: f64,
    /// Standard deviation of the additive Gaussian noise; 0 disables it.
    pub noise_std: f64,
}

impl SamplingConfig {
    /// Validated constructor.
    pub fn new(rate: f64, window: f64, noise_std: f64) -> Result<Self, ScopeError> {
        let config = SamplingConfig {
            rate,
            window,
            noise_std,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the invariants (fields are public and deserializable).
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(ScopeError::InvalidParameter {
                name: "rate",
                value: self.rate,
            });
        }
        if !self.window.is_finite() || self.window <= 0.0 {
            return Err(ScopeError::InvalidParameter {
                name: "window",
                value: self.window,
            });
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(ScopeError::InvalidParameter {
                name: "noise_std",
                value: self.noise_std,
            });
        }
        Ok(())
    }

    /// Number of samples produced over the window: `floor(D·fs) + 1`.
    /// Always at least 1 for a valid config.
    pub fn count(&self) -> usize {
        (self.window * self.rate).floor() as usize + 1
    }
}

/// One discretized observation of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample time in seconds, `0 ≤ t ≤ D`.
    pub t: f64,
    /// Observed value: continuous signal at `t`, plus noise if enabled.
    pub y: f64,
}

/// Sample the signal over the window.
///
/// With `noise_std == 0` this is deterministic and draws nothing. A noisy
/// config draws from the thread rng; use [`sample_with`] to inject a
/// seeded source instead.
pub fn sample(params: &SignalParams, config: &SamplingConfig) -> Result<Vec<Sample>, ScopeError> {
    if config.noise_std > 0.0 {
        return sample_with(params, config, &mut rand::thread_rng());
    }
    params.validate()?;
    config.validate()?;
    Ok(sample_clean(params, config))
}

/// Sample the signal with an explicit noise source.
///
/// The rng is untouched when `noise_std == 0`, so a seeded rng yields a
/// reproducible sequence and the noiseless path stays rng-free.
pub fn sample_with<R: Rng + ?Sized>(
    params: &SignalParams,
    config: &SamplingConfig,
    rng: &mut R,
) -> Result<Vec<Sample>, ScopeError> {
    params.validate()?;
    config.validate()?;

    if config.noise_std == 0.0 {
        return Ok(sample_clean(params, config));
    }

    // Parameters validated above, Normal::new cannot fail here.
    let noise = Normal::new(0.0, config.noise_std).map_err(|_| ScopeError::InvalidParameter {
        name: "noise_std",
        value: config.noise_std,
    })?;

    Ok((0..config.count())
        .map(|i| {
            let t = i as f64 / config.rate;
            Sample {
                t,
                y: model::evaluate(params, t) + noise.sample(rng),
            }
        })
        .collect())
}

fn sample_clean(params: &SignalParams, config: &SamplingConfig) -> Vec<Sample> {
    (0..config.count())
        .map(|i| {
            let t = i as f64 / config.rate;
            Sample {
                t,
                y: model::evaluate(params, t),
            }
        })
        .collect()
}

/// High-resolution reference pass for the "true signal" overlay.
///
/// Same model, second fixed config: `resolution_hz` points per second,
/// no noise. Independent of the player-chosen rate.
pub fn reference_pass(
    params: &SignalParams,
    window: f64,
    resolution_hz: f64,
) -> Result<Vec<Sample>, ScopeError> {
    let config = SamplingConfig::new(resolution_hz, window, 0.0)?;
    sample(params, &config)
}
