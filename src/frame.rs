//! Frame pipeline — one full recomputation of the scope view.
//!
//! A frame is a pure function of the current signal params, sampling
//! config, and render config: sample at the player rate, classify against
//! Nyquist, project alongside the high-resolution reference pass.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;
use crate::signal::aliasing::{self, AliasingStatus};
use crate::signal::model::SignalParams;
use crate::signal::projection::{self, RenderConfig, ScopeGeometry};
use crate::signal::sampling::{self, Sample, SamplingConfig};

/// One recomputed scope view: status, raw samples, and display geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub status: AliasingStatus,
    pub samples: Vec<Sample>,
    pub geometry: ScopeGeometry,
}

/// Recompute the frame for the given inputs.
pub fn render_frame(
    params: &SignalParams,
    sampling: &SamplingConfig,
    render: &RenderConfig,
) -> Result<Frame, ScopeError> {
    let samples = sampling::sample(params, sampling)?;
    let reference = sampling::reference_pass(params, sampling.window, render.oversample_hz)?;
    Ok(Frame {
        status: aliasing::classify(params.frequency, sampling.rate),
        geometry: projection::project(&reference, &samples, sampling.window, render),
        samples,
    })
}

/// Value-equality key for the memo: any field change invalidates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameKey {
    params: SignalParams,
    sampling: SamplingConfig,
    render: RenderConfig,
}

/// Single-entry memo over [`render_frame`], keyed by the full input tuple.
///
/// Replaces the original UI-framework memoization hook: cache the last
/// output, invalidate on any field change. A noisy config (`σ > 0`) is not
/// a pure function of its key and always recomputes.
#[derive(Debug, Default)]
pub struct FrameCache {
    entry: Option<(FrameKey, Arc<Frame>)>,
}

impl FrameCache {
    pub fn new() -> Self {
        FrameCache { entry: None }
    }

    /// Return the cached frame for these inputs, or recompute and cache.
    pub fn get_or_render(
        &mut self,
        params: &SignalParams,
        sampling: &SamplingConfig,
        render: &RenderConfig,
    ) -> Result<Arc<Frame>, ScopeError> {
        let key = FrameKey {
            params: *params,
            sampling: *sampling,
            render: *render,
        };
        if sampling.noise_std == 0.0 {
            if let Some((cached_key, frame)) = &self.entry {
                if *cached_key == key {
                    return Ok(Arc::clone(frame));
                }
            }
        }
        let frame = Arc::new(render_frame(params, sampling, render)?);
        self.entry = Some((key, Arc::clone(&frame)));
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(f: f64, fs: f64) -> (SignalParams, SamplingConfig, RenderConfig) {
        (
            SignalParams::new(f, 1.0, 0.0, 0.0).unwrap(),
            SamplingConfig::new(fs, 1.0, 0.0).unwrap(),
            RenderConfig::default(),
        )
    }

    #[test]
    fn frame_ties_pipeline_together() {
        let (params, sampling, render) = inputs(5.0, 4.0);
        let frame = render_frame(&params, &sampling, &render).unwrap();
        assert_eq!(frame.status, AliasingStatus::Aliasing);
        assert_eq!(frame.samples.len(), 5);
        assert_eq!(frame.geometry.markers.len(), 5);
        assert_eq!(frame.geometry.reference.len(), 1001);
    }

    #[test]
    fn cache_hit_returns_same_allocation() {
        let (params, sampling, render) = inputs(2.0, 20.0);
        let mut cache = FrameCache::new();
        let a = cache.get_or_render(&params, &sampling, &render).unwrap();
        let b = cache.get_or_render(&params, &sampling, &render).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn any_field_change_invalidates() {
        let (params, sampling, render) = inputs(2.0, 20.0);
        let mut cache = FrameCache::new();
        let a = cache.get_or_render(&params, &sampling, &render).unwrap();

        let retuned = SignalParams { frequency: 3.0, ..params };
        let b = cache.get_or_render(&retuned, &sampling, &render).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(a.samples, b.samples);
    }

    #[test]
    fn noisy_config_is_never_served_from_cache() {
        let (params, _, render) = inputs(2.0, 20.0);
        let sampling = SamplingConfig::new(20.0, 1.0, 0.3).unwrap();
        let mut cache = FrameCache::new();
        let a = cache.get_or_render(&params, &sampling, &render).unwrap();
        let b = cache.get_or_render(&params, &sampling, &render).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn invalid_inputs_propagate() {
        let (params, _, render) = inputs(2.0, 20.0);
        let bad = SamplingConfig {
            rate: 0.0,
            window: 1.0,
            noise_std: 0.0,
        };
        assert!(render_frame(&params, &bad, &render).is_err());
    }
}
