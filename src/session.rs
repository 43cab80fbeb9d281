//! Streaming session — pushes recomputed sample batches to one renderer.
//!
//! One session per open connection. The session is push-based: it wakes
//! on a scope-change notification (or an optional server tick), recomputes
//! the frame, and writes one batch. There is no per-interaction request
//! round trip.
//!
//! Backpressure is depth-1 drop-oldest by construction: the scope watch
//! channel only ever holds the newest snapshot, so parameter changes that
//! arrive while a send is in flight coalesce and only the latest state is
//! flushed afterwards. Staleness is acceptable; unbounded buffering is
//! not.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ScopeError;
use crate::frame::FrameCache;
use crate::scope::Scope;
use crate::signal::aliasing::AliasingStatus;
use crate::signal::projection::RenderConfig;
use crate::signal::sampling::Sample;

/// One pushed batch, JSON-shaped for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub scope_id: Uuid,
    /// Strictly increasing within a session; restarts at 0 on reconnect.
    pub sequence: u64,
    pub status: AliasingStatus,
    pub samples: Vec<Sample>,
}

/// Session lifecycle. `Closed` is terminal; `Errored` is reached from
/// `Open` on transport failure and also ends in `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closing,
    Closed,
    Errored,
}

/// Outbound transport seam. The production implementation wraps a
/// WebSocket write half; tests record batches in memory.
#[async_trait]
pub trait BatchSink: Send {
    async fn send(&mut self, batch: &Batch) -> Result<(), ScopeError>;
    /// Best-effort teardown of the transport.
    async fn close(&mut self);
}

/// Per-session knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Viewport constants for the frame pipeline.
    pub render: RenderConfig,
    /// Optional server-side tick: resend the newest state periodically
    /// even without a parameter change.
    pub tick: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            render: RenderConfig::default(),
            tick: None,
        }
    }
}

/// A running streaming session bound to one scope and one connection.
pub struct StreamSession<S: BatchSink> {
    scope_id: Uuid,
    updates: watch::Receiver<Arc<Scope>>,
    sink: S,
    options: SessionOptions,
    sequence: u64,
    cache: FrameCache,
    state: watch::Sender<SessionState>,
}

impl<S: BatchSink> StreamSession<S> {
    pub fn new(updates: watch::Receiver<Arc<Scope>>, sink: S, options: SessionOptions) -> Self {
        let scope_id = updates.borrow().id;
        let (state, _) = watch::channel(SessionState::Connecting);
        StreamSession {
            scope_id,
            updates,
            sink,
            options,
            sequence: 0,
            cache: FrameCache::new(),
            state,
        }
    }

    /// Observe lifecycle transitions from outside the session task.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn transition(&self, next: SessionState) {
        info!(scope_id = %self.scope_id, state = ?next, "session transition");
        self.state.send_replace(next);
    }

    /// Recompute from the newest snapshot and push one batch.
    async fn push_current(&mut self) -> Result<(), ScopeError> {
        let scope = self.updates.borrow_and_update().clone();
        let frame = self
            .cache
            .get_or_render(&scope.params, &scope.sampling, &self.options.render)?;
        let batch = Batch {
            scope_id: self.scope_id,
            sequence: self.sequence,
            status: frame.status,
            samples: frame.samples.clone(),
        };
        self.sink.send(&batch).await?;
        self.sequence += 1;
        Ok(())
    }

    /// Drive the session until the scope goes away, the caller signals
    /// close, or the transport fails. Consumes the session; a reconnect
    /// is a fresh session with a fresh sequence.
    pub async fn run(mut self, mut close: oneshot::Receiver<()>) -> Result<(), ScopeError> {
        // Handshake: the first batch carries the current state.
        if let Err(e) = self.push_current().await {
            error!(scope_id = %self.scope_id, %e, "handshake failed");
            self.transition(SessionState::Errored);
            self.transition(SessionState::Closed);
            return Err(e);
        }
        self.transition(SessionState::Open);

        let mut tick = self.options.tick.map(|period| {
            let mut interval = tokio::time::interval(period);
            // Under backpressure, do not burst-replay missed ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        if let Some(interval) = tick.as_mut() {
            // The immediate first tick is covered by the handshake batch.
            interval.tick().await;
        }

        loop {
            tokio::select! {
                // Close request, or the caller dropped the handle.
                _ = &mut close => {
                    break;
                }
                changed = self.updates.changed() => {
                    match changed {
                        Ok(()) => {
                            if let Err(e) = self.push_current().await {
                                error!(scope_id = %self.scope_id, %e, "transport failed");
                                self.transition(SessionState::Errored);
                                self.transition(SessionState::Closed);
                                return Err(e);
                            }
                        }
                        // Scope removed or store dropped.
                        Err(_) => break,
                    }
                }
                _ = next_tick(&mut tick) => {
                    if let Err(e) = self.push_current().await {
                        error!(scope_id = %self.scope_id, %e, "transport failed");
                        self.transition(SessionState::Errored);
                        self.transition(SessionState::Closed);
                        return Err(e);
                    }
                }
            }
        }

        self.transition(SessionState::Closing);
        self.sink.close().await;
        self.transition(SessionState::Closed);
        Ok(())
    }
}

/// Resolves on the next tick, or never when no tick is configured.
async fn next_tick(tick: &mut Option<Interval>) {
    match tick {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
