//! Render projection — maps `(t, y)` samples into viewport geometry.
//!
//! Time maps linearly from `[0, D]` to `[0, 100]` percent of viewport
//! width; amplitude maps into device pixels around a fixed baseline.
//! Pure and stateless: identical inputs give bit-identical geometry.

use serde::{Deserialize, Serialize};

use crate::signal::sampling::{REFERENCE_RESOLUTION_HZ, Sample};

/// Viewport constants for the projection. Explicit configuration, not
/// derived from the samples, so geometry is testable without a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixel height of a unit of amplitude.
    pub amplitude_px: f64,
    /// Vertical center of the trace, in pixels from the viewport top.
    pub baseline_px: f64,
    /// Oversampling rate of the reference pass, in Hz.
    pub oversample_hz: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            amplitude_px: 120.0,
            baseline_px: 160.0,
            oversample_hz: REFERENCE_RESOLUTION_HZ,
        }
    }
}

/// A projected point: x in percent of viewport width, y in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Display geometry for one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeGeometry {
    /// Polyline approximating the true continuous curve.
    pub reference: Vec<Point>,
    /// Discrete markers at the player-rate sample positions.
    pub markers: Vec<Point>,
    /// The sampled points connected in temporal order — linear
    /// interpolation only, which is what makes aliasing visible.
    pub reconstruction: Vec<Point>,
}

/// Project the reference and sampled sequences into viewport geometry.
///
/// `window` is the duration `D` the `t` values span. Empty inputs produce
/// empty geometry, not an error.
pub fn project(
    reference: &[Sample],
    samples: &[Sample],
    window: f64,
    config: &RenderConfig,
) -> ScopeGeometry {
    let markers = project_points(samples, window, config);
    ScopeGeometry {
        reference: project_points(reference, window, config),
        reconstruction: markers.clone(),
        markers,
    }
}

fn project_points(samples: &[Sample], window: f64, config: &RenderConfig) -> Vec<Point> {
    samples
        .iter()
        .map(|s| Point {
            x: s.t / window * 100.0,
            // Screen y grows downward.
            y: config.baseline_px - s.y * config.amplitude_px,
        })
        .collect()
}
