//! Continuous signal model — analytic sinusoid evaluator.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// Parameters of the continuous signal `y(t) = A·sin(2πft + φ) + V`.
///
/// An immutable value: updates replace the whole set atomically, never
/// one field at a time while a session is reading it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    /// Frequency in Hz, must be positive.
    pub frequency: f64,
    /// Peak amplitude, must be non-negative.
    pub amplitude: f64,
    /// Phase shift in radians, normalized into `[0, 2π)`.
    pub phase: f64,
    /// Vertical offset added to every value.
    pub offset: f64,
}

impl SignalParams {
    /// Validated constructor. Rejects non-positive frequency, negative
    /// amplitude, and any non-finite field; normalizes the phase.
    pub fn new(
        frequency: f64,
        amplitude: f64,
        phase: f64,
        offset: f64,
    ) -> Result<Self, ScopeError> {
        let params = SignalParams {
            frequency,
            amplitude,
            phase: phase.rem_euclid(TAU),
            offset,
        };
        params.validate()?;
        Ok(params)
    }

    /// Re-check the invariants. Fields are public (and deserializable),
    /// so the sampling boundary re-validates before producing output.
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ScopeError::InvalidParameter {
                name: "frequency",
                value: self.frequency,
            });
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(ScopeError::InvalidParameter {
                name: "amplitude",
                value: self.amplitude,
            });
        }
        if !self.phase.is_finite() {
            return Err(ScopeError::InvalidParameter {
                name: "phase",
                value: self.phase,
            });
        }
        if !self.offset.is_finite() {
            return Err(ScopeError::InvalidParameter {
                name: "offset",
                value: self.offset,
            });
        }
        Ok(())
    }
}

/// Evaluate the continuous signal at time `t`.
///
/// Pure and total: any finite `t` with valid params yields a finite value.
pub fn evaluate(params: &SignalParams, t: f64) -> f64 {
    params.amplitude * (TAU * params.frequency * t + params.phase).sin() + params.offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peak_at_quarter_period() {
        let p = SignalParams::new(1.0, 1.0, 0.0, 0.0).unwrap();
        let y = evaluate(&p, 0.25);
        assert!((y - 1.0).abs() < 1e-12, "expected peak, got {y}");
    }

    #[test]
    fn zero_at_start_without_phase() {
        let p = SignalParams::new(440.0, 0.7, 0.0, 0.0).unwrap();
        assert!(evaluate(&p, 0.0).abs() < 1e-12);
    }

    #[test]
    fn offset_shifts_baseline() {
        let p = SignalParams::new(2.0, 1.0, 0.0, 3.0).unwrap();
        assert!((evaluate(&p, 0.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn phase_normalized_mod_tau() {
        let p = SignalParams::new(1.0, 1.0, 3.0 * TAU + 0.5, 0.0).unwrap();
        assert!((p.phase - 0.5).abs() < 1e-9);

        let q = SignalParams::new(1.0, 1.0, -0.5, 0.0).unwrap();
        assert!((q.phase - (TAU - 0.5)).abs() < 1e-9);
    }

    #[test]
    fn rejects_nonpositive_frequency() {
        assert_eq!(
            SignalParams::new(-1.0, 1.0, 0.0, 0.0),
            Err(ScopeError::InvalidParameter {
                name: "frequency",
                value: -1.0
            })
        );
        assert!(SignalParams::new(0.0, 1.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn rejects_non_finite_fields() {
        assert!(SignalParams::new(f64::NAN, 1.0, 0.0, 0.0).is_err());
        assert!(SignalParams::new(1.0, f64::INFINITY, 0.0, 0.0).is_err());
        assert!(SignalParams::new(1.0, 1.0, f64::NAN, 0.0).is_err());
        assert!(SignalParams::new(1.0, 1.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn rejects_negative_amplitude() {
        assert!(SignalParams::new(1.0, -0.1, 0.0, 0.0).is_err());
    }

    #[test]
    fn amplitude_bounds_output() {
        let p = SignalParams::new(3.0, 2.5, 1.0, 0.0).unwrap();
        for i in 0..1000 {
            let y = evaluate(&p, i as f64 * 0.001);
            assert!(y.abs() <= 2.5 + 1e-12, "out of range: {y}");
        }
    }
}
