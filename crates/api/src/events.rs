//! In-process event bus between the catalog and real-time listeners.
//!
//! Built on `tokio::sync::broadcast`: every listener gets every event
//! published after it subscribed, at most once, with no replay. A listener
//! that falls behind skips the events it missed and keeps going.
//!
//! Events relayed on behalf of a listener carry its ID as the origin and are
//! not delivered back to it.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::Product;

/// Default number of events buffered per listener.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Identity of one subscribed listener (one WebSocket connection).
pub type ListenerId = Uuid;

/// Events pushed to listeners.
///
/// Serialized as `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A product was created.
    ProductCreated(Product),
    /// A listener reported a sale. The payload is relayed verbatim.
    SalesUpdated(serde_json::Value),
}

impl ServerEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProductCreated(_) => "productCreated",
            Self::SalesUpdated(_) => "salesUpdated",
        }
    }
}

/// Events sent by listeners.
///
/// A frame without `data` carries `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ClientFrame")]
pub enum ClientEvent {
    /// A sale happened on the client; other listeners get `salesUpdated`.
    SaleMade(serde_json::Value),
}

#[derive(Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<ClientFrame> for ClientEvent {
    type Error = String;

    fn try_from(frame: ClientFrame) -> Result<Self, Self::Error> {
        match frame.event.as_str() {
            "saleMade" => Ok(Self::SaleMade(frame.data)),
            other => Err(format!("unknown client event `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
struct Envelope {
    origin: Option<ListenerId>,
    event: ServerEvent,
}

/// Publish/subscribe hub. Cheap to clone; clones share the channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Envelope>,
}

impl EventBus {
    /// Create a bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus buffering `capacity` events per listener.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to every listener. Returns how many listeners were reached.
    pub fn publish(&self, event: ServerEvent) -> usize {
        self.send(Envelope {
            origin: None,
            event,
        })
    }

    /// Publish on behalf of `origin`, which will not receive it.
    pub fn publish_from(&self, origin: ListenerId, event: ServerEvent) -> usize {
        self.send(Envelope {
            origin: Some(origin),
            event,
        })
    }

    fn send(&self, envelope: Envelope) -> usize {
        let name = envelope.event.name();
        match self.sender.send(envelope) {
            Ok(receivers) => {
                debug!(event = name, receivers, "Event published");
                receivers
            }
            Err(_) => {
                debug!(event = name, "Event dropped (no listeners)");
                0
            }
        }
    }

    /// Register a new listener.
    #[must_use]
    pub fn subscribe(&self) -> Listener {
        Listener {
            id: Uuid::new_v4(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of one listener.
#[derive(Debug)]
pub struct Listener {
    id: ListenerId,
    receiver: broadcast::Receiver<Envelope>,
}

impl Listener {
    /// This listener's ID, used as the origin of events it relays.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Wait for the next event not originated by this listener.
    ///
    /// Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.origin == Some(self.id) => {}
                Ok(envelope) => return Some(envelope.event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(listener = %self.id, skipped, "Listener lagged, events skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sale(n: i64) -> ServerEvent {
        ServerEvent::SalesUpdated(json!({ "venta": n }))
    }

    #[tokio::test]
    async fn test_publish_without_listeners() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(sale(1)), 0);
        assert_eq!(bus.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_to_every_listener() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(sale(1)), 2);

        assert_eq!(a.recv().await, Some(sale(1)));
        assert_eq!(b.recv().await, Some(sale(1)));
    }

    #[tokio::test]
    async fn test_origin_does_not_receive_its_own_relay() {
        let bus = EventBus::new();
        let mut sender = bus.subscribe();
        let mut other = bus.subscribe();

        bus.publish_from(sender.id(), sale(1));
        bus.publish(sale(2));

        assert_eq!(other.recv().await, Some(sale(1)));
        assert_eq!(other.recv().await, Some(sale(2)));
        // The sender skips its own relay and sees the next event.
        assert_eq!(sender.recv().await, Some(sale(2)));
    }

    #[tokio::test]
    async fn test_late_listener_gets_no_replay() {
        let bus = EventBus::new();
        let _keepalive = bus.subscribe();
        bus.publish(sale(1));

        let mut late = bus.subscribe();
        bus.publish(sale(2));
        assert_eq!(late.recv().await, Some(sale(2)));
    }

    #[tokio::test]
    async fn test_lagging_listener_skips_and_continues() {
        let bus = EventBus::with_capacity(2);
        let mut slow = bus.subscribe();

        for n in 0..5 {
            bus.publish(sale(n));
        }

        // Oldest events were overwritten; the listener resumes at the oldest kept one.
        assert_eq!(slow.recv().await, Some(sale(3)));
        assert_eq!(slow.recv().await, Some(sale(4)));
    }

    #[tokio::test]
    async fn test_closed_bus_ends_listener() {
        let bus = EventBus::new();
        let mut listener = bus.subscribe();
        drop(bus);
        assert_eq!(listener.recv().await, None);
    }

    #[test]
    fn test_wire_format() {
        let frame = serde_json::to_value(sale(7)).unwrap();
        assert_eq!(frame, json!({ "event": "salesUpdated", "data": { "venta": 7 } }));

        let parsed: ClientEvent =
            serde_json::from_str(r#"{"event":"saleMade","data":{"total":99.5}}"#).unwrap();
        assert_eq!(parsed, ClientEvent::SaleMade(json!({ "total": 99.5 })));

        let parsed: ClientEvent = serde_json::from_str(r#"{"event":"saleMade"}"#).unwrap();
        assert_eq!(parsed, ClientEvent::SaleMade(serde_json::Value::Null));

        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"unknown","data":1}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>(r#"{"data":1}"#).is_err());
    }
}
