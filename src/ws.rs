//! WebSocket boundary — one streaming session per connection.
//!
//! The connection is addressed per scope (`/ws/scope/{scope_id}`) and
//! speaks the JSON batch protocol from [`crate::session`]. Delivery is
//! push-only: incoming data frames are ignored rather than answered, so
//! a chatty client cannot turn the stream back into a request-per-frame
//! exchange.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::oneshot;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ScopeError;
use crate::scope::ScopeStore;
use crate::session::{Batch, BatchSink, SessionOptions, StreamSession};

/// Shared state for the streaming routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScopeStore>,
    pub options: SessionOptions,
}

/// Build the streaming router. The host mounts this next to its own
/// CRUD routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws/scope/{scope_id}", get(ws_scope))
        .with_state(state)
}

async fn ws_scope(
    Path(scope_id): Path<Uuid>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, scope_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, scope_id: Uuid) {
    let updates = match state.store.subscribe(scope_id).await {
        Ok(updates) => updates,
        Err(e) => {
            warn!(%scope_id, %e, "rejecting connection");
            reject(socket).await;
            return;
        }
    };

    info!(%scope_id, "renderer connected");
    let (sender, mut receiver) = socket.split();
    let session = StreamSession::new(updates, WsBatchSink { sender }, state.options);
    let (close_tx, close_rx) = oneshot::channel();
    let mut session_task = tokio::spawn(session.run(close_rx));

    // Read half: watch for the client going away. Ping/pong is handled by
    // the transport; text and binary frames are deliberately ignored.
    loop {
        tokio::select! {
            result = &mut session_task => {
                log_session_end(scope_id, result.unwrap_or_else(|e| {
                    Err(ScopeError::Transport(e.to_string()))
                }));
                return;
            }
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }

    let _ = close_tx.send(());
    log_session_end(
        scope_id,
        session_task
            .await
            .unwrap_or_else(|e| Err(ScopeError::Transport(e.to_string()))),
    );
}

fn log_session_end(scope_id: Uuid, result: Result<(), ScopeError>) {
    match result {
        Ok(()) => info!(%scope_id, "session closed"),
        Err(e) => warn!(%scope_id, %e, "session ended with error"),
    }
}

async fn reject(socket: WebSocket) {
    let (mut sender, _receiver) = socket.split();
    let payload = serde_json::json!({ "error": "scope not found" });
    if let Ok(text) = serde_json::to_string(&payload) {
        let _ = sender.send(Message::Text(text.into())).await;
    }
    let _ = sender.close().await;
}

/// Adapts the socket write half to the session's transport seam.
struct WsBatchSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl BatchSink for WsBatchSink {
    async fn send(&mut self, batch: &Batch) -> Result<(), ScopeError> {
        let text = serde_json::to_string(batch)?;
        self.sender.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn close(&mut self) {
        let _ = self.sender.close().await;
    }
}
