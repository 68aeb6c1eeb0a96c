//! WebSocket endpoint for the real-time channel.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! The server pushes `productCreated` and `salesUpdated`; a client may send
//! `saleMade`, which is relayed as `salesUpdated` to every other client.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::events::{ClientEvent, EventBus, Listener, ListenerId, ServerEvent};
use crate::state::AppState;

/// Upgrade to a WebSocket and join the event bus.
///
/// GET /ws
pub async fn connect(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let bus = state.events().clone();
    let listener = bus.subscribe();
    ws.on_upgrade(move |socket| session(socket, bus, listener))
}

async fn session(socket: WebSocket, bus: EventBus, mut listener: Listener) {
    let id = listener.id();
    info!(listener = %id, listeners = bus.listener_count(), "Real-time client connected");

    let (mut sink, mut stream) = socket.split();

    let mut forward = tokio::spawn(async move {
        while let Some(event) = listener.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(listener = %listener.id(), error = %e, "Failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let mut receive = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => {
                    relay_frame(&bus, id, text.as_str());
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Whichever half finishes first ends the session.
    tokio::select! {
        _ = &mut forward => receive.abort(),
        _ = &mut receive => forward.abort(),
    }

    info!(listener = %id, "Real-time client disconnected");
}

/// Handle one client frame. Returns whether anything was relayed.
fn relay_frame(bus: &EventBus, origin: ListenerId, text: &str) -> bool {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::SaleMade(data)) => {
            bus.publish_from(origin, ServerEvent::SalesUpdated(data));
            true
        }
        Err(e) => {
            debug!(listener = %origin, error = %e, "Ignoring client frame");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_sale_is_relayed_to_other_listeners() {
        let bus = EventBus::new();
        let seller = bus.subscribe();
        let mut watcher = bus.subscribe();

        assert!(relay_frame(
            &bus,
            seller.id(),
            r#"{"event":"saleMade","data":{"total":120}}"#
        ));

        assert_eq!(
            watcher.recv().await,
            Some(ServerEvent::SalesUpdated(json!({ "total": 120 })))
        );
    }

    #[tokio::test]
    async fn test_sale_without_payload_is_relayed_as_null() {
        let bus = EventBus::new();
        let seller = bus.subscribe();
        let mut watcher = bus.subscribe();

        assert!(relay_frame(&bus, seller.id(), r#"{"event":"saleMade"}"#));
        assert_eq!(
            watcher.recv().await,
            Some(ServerEvent::SalesUpdated(serde_json::Value::Null))
        );
    }

    #[test]
    fn test_unknown_frames_are_ignored() {
        let bus = EventBus::new();
        let client = bus.subscribe();

        assert!(!relay_frame(&bus, client.id(), "not json"));
        assert!(!relay_frame(&bus, client.id(), r#"{"event":"productCreated","data":{}}"#));
    }
}
