//! WebSocket event broadcaster for real-time updates
//!
//! Every dashboard and assistant state change is pushed to all connected
//! pages so that several open tabs stay in sync.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::ServerAppState;

pub const DASHBOARD_CHANGED: &str = "dashboard:changed";
pub const ASSISTANT_SENDING: &str = "assistant:sending";
pub const ASSISTANT_MESSAGE: &str = "assistant:message";
pub const ASSISTANT_FAILED: &str = "assistant:failed";
pub const ASSISTANT_RESET: &str = "assistant:reset";

/// A server event that can be broadcast to WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEvent {
    /// Event type (e.g., "dashboard:changed", "assistant:message")
    pub event: String,
    /// Event payload as JSON value
    pub payload: serde_json::Value,
}

/// Broadcasts events to all connected WebSocket clients
pub struct EventBroadcaster {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventBroadcaster {
    /// Create a new event broadcaster with a channel capacity of 256 events
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    /// Broadcast an event to all connected clients
    pub fn broadcast(&self, event_type: &str, payload: impl Serialize) {
        let event = ServerEvent {
            event: event_type.to_string(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        };

        // Ignore send errors (no receivers)
        let _ = self.tx.send(event);
    }

    /// Subscribe to events (returns a receiver)
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerAppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, state: ServerAppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut event_rx = state.broadcaster.subscribe();

    log::info!("WebSocket client connected");

    let send_task = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("Failed to serialize event: {}", e),
                },
                // The page re-fetches on the next event, so skipped ones are harmless
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    log::debug!("WebSocket client lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // The page never sends anything meaningful; just wait for it to go away
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Text(text)) => log::trace!("Ignoring client message: {}", text),
            Ok(_) => {}
            Err(e) => {
                log::warn!("WebSocket error: {}", e);
                break;
            }
        }
    }

    send_task.abort();
    log::info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_broadcaster_delivers_to_subscribers() {
        let broadcaster = EventBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(DASHBOARD_CHANGED, serde_json::json!({"optimized": true}));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event, "dashboard:changed");
        assert_eq!(event.payload["optimized"], true);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_ignored() {
        let broadcaster = EventBroadcaster::new();
        broadcaster.broadcast(ASSISTANT_RESET, ());
    }

    #[test]
    fn test_server_event_serialization() {
        let event = ServerEvent {
            event: ASSISTANT_FAILED.to_string(),
            payload: serde_json::json!({ "status": "failed" }),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("assistant:failed"));
        assert!(json.contains("\"payload\""));
    }
}
