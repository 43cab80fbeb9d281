//! Signal core for the Nyquist sniper-scope game.
//!
//! Models a continuous sinusoid, discretizes it at a player-chosen rate,
//! classifies the result against the Nyquist criterion, projects it into
//! viewport geometry, and streams recomputed batches to a connected
//! renderer over WebSocket. Account/scope CRUD, persistence, and the
//! renderer itself are host concerns behind the [`scope::ScopeStore`]
//! and [`session::BatchSink`] seams.

pub mod error;
pub mod frame;
pub mod scope;
pub mod session;
pub mod signal;
pub mod ws;

pub use crate::error::ScopeError;
pub use crate::frame::{Frame, FrameCache, render_frame};
pub use crate::scope::{MemoryScopeStore, Scope, ScopeStore, ScopeUpdate};
pub use crate::session::{Batch, BatchSink, SessionOptions, SessionState, StreamSession};
pub use crate::signal::aliasing::{AliasingStatus, classify};
pub use crate::signal::model::{SignalParams, evaluate};
pub use crate::signal::projection::{Point, RenderConfig, ScopeGeometry, project};
pub use crate::signal::sampling::{
    Sample, SamplingConfig, reference_pass, sample, sample_with,
};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
