//! Signal core — pure, deterministic sampling mathematics.
//!
//! Everything in this module is side-effect free: the continuous model,
//! the discretizing sampler, the Nyquist classifier, and the viewport
//! projection. The streaming layer drives these, it never reaches into
//! them.

pub mod aliasing;
pub mod model;
pub mod projection;
pub mod sampling;
