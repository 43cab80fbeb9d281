//! Scope entity and store boundary.
//!
//! A `Scope` is the durable thing a streaming session binds to: who owns
//! it and the current signal/sampling parameters. Persistence proper is a
//! collaborator behind [`ScopeStore`]; the in-memory implementation here
//! doubles as the reference semantics — in particular, atomic
//! whole-snapshot replacement with change notification, so a session
//! reading mid-update sees either the old or the new params, never a torn
//! mix.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::error::ScopeError;
use crate::signal::model::SignalParams;
use crate::signal::sampling::SamplingConfig;

/// A scope: owning user plus the tunable signal and sampling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub id: Uuid,
    pub user_id: Uuid,
    pub params: SignalParams,
    pub sampling: SamplingConfig,
}

impl Scope {
    pub fn new(user_id: Uuid, params: SignalParams, sampling: SamplingConfig) -> Self {
        Scope {
            id: Uuid::new_v4(),
            user_id,
            params,
            sampling,
        }
    }

    fn validate(&self) -> Result<(), ScopeError> {
        self.params.validate()?;
        self.sampling.validate()
    }
}

/// Partial update of a scope's tunable fields. Applied all-or-nothing:
/// the merged snapshot is validated before it replaces the old one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeUpdate {
    pub frequency: Option<f64>,
    pub amplitude: Option<f64>,
    pub phase: Option<f64>,
    pub offset: Option<f64>,
    pub rate: Option<f64>,
    pub window: Option<f64>,
    pub noise_std: Option<f64>,
}

impl ScopeUpdate {
    /// Merge onto an existing scope, yielding the candidate snapshot.
    fn apply(&self, scope: &Scope) -> Result<Scope, ScopeError> {
        let params = SignalParams::new(
            self.frequency.unwrap_or(scope.params.frequency),
            self.amplitude.unwrap_or(scope.params.amplitude),
            self.phase.unwrap_or(scope.params.phase),
            self.offset.unwrap_or(scope.params.offset),
        )
        .map_err(|e| ScopeError::MalformedUpdate(e.to_string()))?;
        let sampling = SamplingConfig::new(
            self.rate.unwrap_or(scope.sampling.rate),
            self.window.unwrap_or(scope.sampling.window),
            self.noise_std.unwrap_or(scope.sampling.noise_std),
        )
        .map_err(|e| ScopeError::MalformedUpdate(e.to_string()))?;
        Ok(Scope {
            id: scope.id,
            user_id: scope.user_id,
            params,
            sampling,
        })
    }
}

/// Storage boundary for scopes. The host's CRUD layer implements this;
/// the core only ever takes read snapshots and change notifications.
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Add a scope. Rejects invalid params/config.
    async fn insert(&self, scope: Scope) -> Result<(), ScopeError>;

    /// Read the current snapshot.
    async fn get(&self, id: Uuid) -> Result<Arc<Scope>, ScopeError>;

    /// Apply a partial update atomically; returns the new snapshot.
    /// A failing update leaves the previous snapshot untouched.
    async fn update(&self, id: Uuid, update: ScopeUpdate) -> Result<Arc<Scope>, ScopeError>;

    /// Remove a scope, closing every subscription to it.
    async fn remove(&self, id: Uuid) -> Result<(), ScopeError>;

    /// Subscribe to snapshot changes. The receiver always holds the
    /// latest whole snapshot; superseded intermediates coalesce.
    async fn subscribe(&self, id: Uuid) -> Result<watch::Receiver<Arc<Scope>>, ScopeError>;
}

/// In-memory reference store. One watch channel per scope serves as both
/// the atomic snapshot cell and the change-notification feed.
#[derive(Default)]
pub struct MemoryScopeStore {
    scopes: RwLock<HashMap<Uuid, watch::Sender<Arc<Scope>>>>,
}

impl MemoryScopeStore {
    pub fn new() -> Self {
        MemoryScopeStore {
            scopes: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ScopeStore for MemoryScopeStore {
    async fn insert(&self, scope: Scope) -> Result<(), ScopeError> {
        scope.validate()?;
        let id = scope.id;
        let (tx, _rx) = watch::channel(Arc::new(scope));
        self.scopes.write().insert(id, tx);
        info!(scope_id = %id, "scope created");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Arc<Scope>, ScopeError> {
        let scopes = self.scopes.read();
        let tx = scopes.get(&id).ok_or(ScopeError::ScopeNotFound(id))?;
        Ok(tx.borrow().clone())
    }

    async fn update(&self, id: Uuid, update: ScopeUpdate) -> Result<Arc<Scope>, ScopeError> {
        // Merge and swap under the write lock so concurrent updates
        // serialize; subscribers only ever see whole snapshots.
        let scopes = self.scopes.write();
        let tx = scopes.get(&id).ok_or(ScopeError::ScopeNotFound(id))?;
        let current = tx.borrow().clone();
        let next = Arc::new(update.apply(&current)?);
        tx.send_replace(Arc::clone(&next));
        info!(scope_id = %id, "scope updated");
        Ok(next)
    }

    async fn remove(&self, id: Uuid) -> Result<(), ScopeError> {
        self.scopes
            .write()
            .remove(&id)
            .ok_or(ScopeError::ScopeNotFound(id))?;
        info!(scope_id = %id, "scope removed");
        Ok(())
    }

    async fn subscribe(&self, id: Uuid) -> Result<watch::Receiver<Arc<Scope>>, ScopeError> {
        let scopes = self.scopes.read();
        let tx = scopes.get(&id).ok_or(ScopeError::ScopeNotFound(id))?;
        Ok(tx.subscribe())
    }
}
