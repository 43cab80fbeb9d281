use std::fmt;
use uuid::Uuid;

/// Errors surfaced by the scope core.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeError {
    /// A signal or sampling parameter failed validation. Rejected at the
    /// call that constructed it; never clamped, never partially applied.
    InvalidParameter { name: &'static str, value: f64 },
    /// No scope with the given id exists in the store.
    ScopeNotFound(Uuid),
    /// A partial update failed validation; the previous snapshot is kept.
    MalformedUpdate(String),
    /// The outbound transport failed; drives a session to `Errored`.
    Transport(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter {name}: {value}")
            }
            ScopeError::ScopeNotFound(id) => write!(f, "Scope not found: {id}"),
            ScopeError::MalformedUpdate(reason) => write!(f, "Malformed update: {reason}"),
            ScopeError::Transport(reason) => write!(f, "Transport failure: {reason}"),
        }
    }
}

impl std::error::Error for ScopeError {}

impl From<axum::Error> for ScopeError {
    fn from(e: axum::Error) -> Self {
        ScopeError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ScopeError {
    fn from(e: serde_json::Error) -> Self {
        ScopeError::Transport(e.to_string())
    }
}
